//! Renderer environment

use std::fmt;
use std::rc::Rc;

use smol::LocalExecutor;
use splice_dom::Window;
use splice_net::SectionSource;

use crate::resolver::{AmbientContext, SectionContainerContext};

/// Everything a renderer needs from its host page
#[derive(Clone)]
pub struct RenderEnv {
    pub window: Rc<Window>,
    /// Runs debounce timers and activations
    pub executor: Rc<LocalExecutor<'static>>,
    pub source: Rc<dyn SectionSource>,
    pub context: Rc<dyn AmbientContext>,
}

impl RenderEnv {
    /// Environment with the default section-container context
    pub fn new(
        window: Rc<Window>,
        executor: Rc<LocalExecutor<'static>>,
        source: Rc<dyn SectionSource>,
    ) -> Self {
        Self {
            window,
            executor,
            source,
            context: Rc::new(SectionContainerContext),
        }
    }

    /// Replace the ambient context provider
    pub fn with_context(mut self, context: Rc<dyn AmbientContext>) -> Self {
        self.context = context;
        self
    }
}

impl fmt::Debug for RenderEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderEnv")
            .field("location", &self.window.location().as_str())
            .finish_non_exhaustive()
    }
}
