pub mod closure;
pub mod naming;
pub mod parameters;
pub mod references;

pub use closure::{SchemaDict, definition_type_name, resolve_closure};
pub use naming::{capitalize, decapitalize, name_from_id, operation_name, route_to_name};
pub use parameters::merge_parameters;
pub use references::{ReferenceSource, extract_references};
