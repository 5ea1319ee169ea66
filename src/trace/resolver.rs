use super::signature::Signature;
use std::sync::Arc;

/// Signatures from the callable a trace was applied to, through every
/// declared "stands in for" link, to the true original.
#[derive(Debug, Clone)]
pub struct WrapperChain {
    links: Vec<Arc<Signature>>,
}

impl WrapperChain {
    /// Follow `wraps` links from `start` until one declares none.
    ///
    /// A wrapper that declares nothing ends the chain, so an opaque wrapper
    /// is its own original.
    pub fn discover(start: &Arc<Signature>) -> Self {
        let mut links = vec![Arc::clone(start)];
        while let Some(next) = links.last().and_then(|s| s.wraps().cloned()) {
            links.push(next);
        }
        Self { links }
    }

    pub fn original(&self) -> &Signature {
        // never empty: `discover` seeds it with `start`
        &self.links[self.links.len() - 1]
    }

    pub fn outermost(&self) -> &Signature {
        &self.links[0]
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Whether any hop was followed.
    pub fn is_unwrapped(&self) -> bool {
        self.links.len() > 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.links.iter().map(|s| s.as_ref())
    }
}
