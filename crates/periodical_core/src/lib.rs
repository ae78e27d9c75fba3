//! Periodical core: the in-memory document model threaded through one run.
mod article;
mod context;
mod group;
mod registry;
mod stage;

pub use article::{Article, ArticleDraft};
pub use context::{DocumentContext, COVER_ASSET};
pub use group::{group_by_subsection, SubsectionGroup};
pub use registry::ImageRegistry;
pub use stage::Stage;
