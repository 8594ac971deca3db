pub mod plan;
pub mod session;
pub mod template;

pub use plan::Plan;
pub use session::{Entry, Session};
pub use template::{Exercise, Template, TemplateRecord};
