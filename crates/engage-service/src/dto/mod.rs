//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateChannelAccountRequest, CreateImmediateRequest, CreateRuleRequest,
    DeliveryOutcomeRequest, EstimateAudienceRequest, InboundMessageRequest, PreviewMatchRequest,
    SendBroadcastRequest, SetEnabledRequest, UpdateChannelAccountRequest, UpdateImmediateRequest,
    UpdateRuleRequest,
};

pub use responses::{
    AudienceEstimateResponse, BroadcastQueuedResponse, BroadcastResponse, BroadcastStatsResponse,
    ChannelAccountResponse, DeliveryResponse, HealthChecks, HealthResponse, ImmediateResponse,
    ImmediateSendResponse, InboundResultResponse, PreviewMatchResponse, ReadinessResponse,
    RuleResponse, TagFailureResponse,
};
