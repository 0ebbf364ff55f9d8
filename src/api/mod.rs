pub mod svg;
pub mod validate;

pub use svg::__path_handle_cable_structure;
pub use svg::{handle_cable_structure, svg_response, ErrorResponse, ProcessRequestBody};
pub use validate::{validate_payload, validate_request, PROCESS_NAME_FIELD};
