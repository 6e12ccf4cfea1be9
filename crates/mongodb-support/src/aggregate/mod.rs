mod pipeline;
mod sort_document;
mod stage;

pub use self::pipeline::Pipeline;
pub use self::sort_document::SortDocument;
pub use self::stage::Stage;
