//! Offline cache manifest and the service worker generated from it.
//!
//! The worker pre-caches the manifest on install, answers GETs cache-first
//! with a network fallback that stores good responses, lets every other
//! method through untouched, and drops caches with any other name on
//! activation.

const WORKER_TEMPLATE: &str = include_str!("../assets/sw.js");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheManifest {
    pub name: String,
    pub urls: Vec<String>,
}

impl Default for CacheManifest {
    fn default() -> Self {
        Self {
            name: "ai-physiognomy-v1".to_string(),
            urls: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "https://cdn.tailwindcss.com".to_string(),
                "https://fonts.googleapis.com/css2?family=Noto+Sans+KR:wght@300;400;500;700&display=swap"
                    .to_string(),
            ],
        }
    }
}

impl CacheManifest {
    pub fn service_worker_script(&self) -> String {
        // JSON string and array literals are valid JavaScript literals.
        let name = serde_json::Value::String(self.name.clone()).to_string();
        let urls = serde_json::Value::from(self.urls.clone()).to_string();
        WORKER_TEMPLATE
            .replace("__CACHE_NAME__", &name)
            .replace("__PRECACHE_URLS__", &urls)
    }
}

#[cfg(test)]
mod tests {
    use super::CacheManifest;

    #[test]
    fn script_embeds_manifest() {
        let manifest = CacheManifest::default();
        let script = manifest.service_worker_script();
        assert!(script.contains(r#"const CACHE_NAME = "ai-physiognomy-v1";"#));
        assert!(script.contains(r#""https://cdn.tailwindcss.com""#));
        assert!(!script.contains("__CACHE_NAME__"));
        assert!(!script.contains("__PRECACHE_URLS__"));
    }

    #[test]
    fn script_skips_non_get_and_purges_by_name() {
        let script = CacheManifest::default().service_worker_script();
        assert!(script.contains("request.method !== 'GET'"));
        assert!(script.contains("name !== CACHE_NAME"));
        assert!(script.contains("addEventListener('install'"));
        assert!(script.contains("addEventListener('activate'"));
    }

    #[test]
    fn names_are_escaped_as_literals() {
        let manifest = CacheManifest {
            name: "quote\"d".to_string(),
            urls: vec![],
        };
        let script = manifest.service_worker_script();
        assert!(script.contains(r#"const CACHE_NAME = "quote\"d";"#));
        assert!(script.contains("const PRECACHE_URLS = [];"));
    }
}
