//! Common validation stages shared by the resource handlers
//!
//! Each factory borrows the request's [`crate::params::Params`] and returns
//! a ready-to-chain [`crate::pipeline::Stage`]. Handlers either use one
//! directly as the pipeline's entry stage or hang extra checks off it.
//!
//! - service: adding/creating/updating services, in-range queries, lookups,
//!   maintainers, imports, ids
//! - review: creating, paging, editing and fetching reviews

pub mod review;
pub mod service;

pub use review::{
    review_by_order_validate, review_id_validate, review_validate, update_review_validate,
};
pub use service::{
    add_maintainer_validate, adding_service_parse, adding_service_validate,
    create_service_validate, id_validate, import_validate, in_range_validate, name_validate,
    query_service_validate, query_services_validate, remove_maintainer_validate,
    update_service_validate,
};
