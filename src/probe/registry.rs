// src/probe/registry.rs
use super::{CustomProbe, MemcachedProbe, Probe, ProbeKind, RedisProbe, UnsupportedProbe, WebProbe};
use std::sync::Arc;

/// Resolves a `ProbeKind` to the probe that handles it.
#[derive(Clone)]
pub struct ProbeRegistry {
    redis: Arc<dyn Probe>,
    memcached: Arc<dyn Probe>,
    web: Arc<dyn Probe>,
    custom: Arc<dyn Probe>,
    unsupported: Arc<dyn Probe>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self {
            redis: Arc::new(RedisProbe::new()),
            memcached: Arc::new(MemcachedProbe::new()),
            web: Arc::new(WebProbe::new()),
            custom: Arc::new(CustomProbe::new()),
            unsupported: Arc::new(UnsupportedProbe::new()),
        }
    }

    pub fn resolve(&self, kind: &ProbeKind) -> Arc<dyn Probe> {
        match kind {
            ProbeKind::Redis => self.redis.clone(),
            ProbeKind::Memcached => self.memcached.clone(),
            ProbeKind::Web => self.web.clone(),
            ProbeKind::Custom => self.custom.clone(),
            ProbeKind::Unsupported(tag) => {
                tracing::debug!("No probe registered for type {:?}", tag);
                self.unsupported.clone()
            }
        }
    }
}

impl Default for ProbeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{CUSTOM_KIND, MEMCACHED_KIND, REDIS_KIND, UNSUPPORTED_KIND, WEB_KIND};

    #[test]
    fn known_tags_resolve_to_their_probe() {
        let registry = ProbeRegistry::new();
        let cases = [
            ("redis", REDIS_KIND),
            ("memcached", MEMCACHED_KIND),
            ("web", WEB_KIND),
            ("custom", CUSTOM_KIND),
        ];
        for (tag, kind) in cases {
            assert_eq!(registry.resolve(&ProbeKind::from(tag)).kind(), kind);
        }
    }

    #[test]
    fn unknown_tags_fall_back() {
        let registry = ProbeRegistry::new();
        for tag in ["", "Redis", "postgres", "unknown"] {
            let kind = ProbeKind::from(tag);
            assert_eq!(kind, ProbeKind::Unsupported(tag.to_string()));
            assert_eq!(registry.resolve(&kind).kind(), UNSUPPORTED_KIND);
        }
    }
}
