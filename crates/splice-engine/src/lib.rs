//! Splice Engine
//!
//! Attribute-driven partial page updates. A `<section-renderer>` element
//! binds its trigger elements; each activation requests named sections from
//! the server in one GET and patches the returned fragments into the page.
//!
//! # Example
//! ```rust,ignore
//! use splice_engine::{upgrade_all, RenderEnv};
//!
//! let env = RenderEnv::new(window, executor, source);
//! let renderers = upgrade_all(&env);
//! smol::block_on(env.executor.run(renderers[0].render(trigger)))?;
//! ```

pub mod attributes;
mod config;
mod error;
mod env;
mod registry;
mod debounce;
mod binder;
mod activator;
mod resolver;
mod fetch;
mod patcher;
mod lifecycle;
mod renderer;
mod upgrade;

pub use config::{HistoryMode, RendererConfig, TriggerConfig};
pub use error::{ErrorKind, RenderError};
pub use env::RenderEnv;
pub use registry::TriggerSet;
pub use debounce::Debouncer;
pub use resolver::{
    AmbientContext, AmbientFields, InsertMode, ResolvedBatch, SectionContainerContext,
    UpdateDescriptor,
};
pub use fetch::FragmentResponse;
pub use lifecycle::{
    EVENT_DESTROYING, EVENT_INITIALIZED, EVENT_RENDER_ENDED, EVENT_RENDER_ERROR,
    EVENT_RENDER_STARTED,
};
pub use renderer::SectionRenderer;
pub use upgrade::upgrade_all;

// Re-export sub-crates for embedding
pub use splice_dom as dom;
pub use splice_html as html;
pub use splice_net as net;
