//! 业务能力层
//!
//! 每个模块只负责一件事，只通过 `ListingDom` 访问页面，不关心批次流程。

pub mod course_locator;
pub mod discussion;
pub mod expansion;
pub mod input_normalizer;
pub mod listing_address;
pub mod row_extractor;
pub mod status_classifier;

pub use course_locator::{find_course_root, LocatedCourse, COURSE_HEADING_SELECTOR};
pub use discussion::{DiscussionExpander, DiscussionExpansion};
pub use expansion::{ExpansionController, ExpansionState};
pub use input_normalizer::normalize_course_inputs;
pub use listing_address::build_results_url;
pub use row_extractor::extract_section_status;
pub use status_classifier::{normalize_text, status_is_open};
