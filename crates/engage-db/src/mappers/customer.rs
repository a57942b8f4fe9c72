//! Customer / content model -> entity mappers

use engage_core::entities::{ContentKind, ContentObject, Customer};
use engage_core::value_objects::{ContentId, CustomerId, TenantId};

use crate::models::{ContentModel, CustomerModel};

impl From<CustomerModel> for Customer {
    fn from(model: CustomerModel) -> Self {
        Customer {
            id: CustomerId::from_uuid(model.id),
            tenant_id: TenantId::from_uuid(model.tenant_id),
            customer_type: model.customer_type,
            // A non-object identifier bag carries no usable identifiers
            identifiers: model.identifiers.as_object().cloned().unwrap_or_default(),
        }
    }
}

/// Content rows do not record their kind; the caller knows which table was read
pub fn content_from_model(model: ContentModel, kind: ContentKind) -> ContentObject {
    ContentObject {
        id: ContentId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        kind,
        name: model.name,
        content: model.content,
        updated_at: model.updated_at,
    }
}
