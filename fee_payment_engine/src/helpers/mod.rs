mod identifiers;
mod paging;
mod validation;

pub use identifiers::{new_custom_order_id, new_webhook_id, CUSTOM_ORDER_ID_PREFIX, WEBHOOK_ID_PREFIX};
pub use paging::{parse_leading_int, total_pages};
pub use validation::{is_valid_email, is_valid_uri};
