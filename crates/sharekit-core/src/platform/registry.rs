//! Registry of known platforms, built-in plus caller-registered.

use std::collections::HashMap;

use super::{IconSet, PlatformDescriptor, ShareAction, UrlTemplate};

/// Built-in platform table: key, name, fontawesome icon, icomoon icon, color,
/// and either a URL pattern or an action.
pub const BUILTIN_PLATFORMS: &[(&str, &str, &str, &str, &str, Builtin)] = &[
    ("facebook", "Facebook", "fab fa-facebook-f", "icon-facebook", "#1877f2",
        Builtin::Url("https://www.facebook.com/sharer/sharer.php?u={url}")),
    ("twitter", "Twitter", "fab fa-twitter", "icon-twitter", "#1da1f2",
        Builtin::Url("https://twitter.com/intent/tweet?url={url}&text={title}")),
    ("linkedin", "LinkedIn", "fab fa-linkedin-in", "icon-linkedin", "#0077b5",
        Builtin::Url("https://www.linkedin.com/sharing/share-offsite/?url={url}")),
    ("whatsapp", "WhatsApp", "fab fa-whatsapp", "icon-whatsapp", "#25d366",
        Builtin::Url("https://wa.me/?text={title}%20{url}")),
    ("telegram", "Telegram", "fab fa-telegram-plane", "icon-telegram", "#0088cc",
        Builtin::Url("https://t.me/share/url?url={url}&text={title}")),
    ("reddit", "Reddit", "fab fa-reddit-alien", "icon-reddit", "#ff4500",
        Builtin::Url("https://www.reddit.com/submit?url={url}&title={title}")),
    ("pinterest", "Pinterest", "fab fa-pinterest-p", "icon-pinterest", "#bd081c",
        Builtin::Url("https://pinterest.com/pin/create/button/?url={url}&description={title}")),
    ("tumblr", "Tumblr", "fab fa-tumblr", "icon-tumblr", "#00cf35",
        Builtin::Url("https://www.tumblr.com/widgets/share/tool?canonicalUrl={url}&title={title}")),
    ("email", "Email", "fas fa-envelope", "icon-mail", "#34495e",
        Builtin::Url("mailto:?subject={title}&body={url}")),
    ("copy", "Copy Link", "fas fa-link", "icon-link", "#6c5ce7",
        Builtin::Action(ShareAction::Copy)),
    ("print", "Print", "fas fa-print", "icon-printer", "#95a5a6",
        Builtin::Action(ShareAction::Print)),
    ("sms", "SMS", "fas fa-sms", "icon-mobile", "#2ecc71",
        Builtin::Url("sms:?body={title}%20{url}")),
];

/// Share behavior of a built-in entry.
#[derive(Debug, Clone, Copy)]
pub enum Builtin {
    Url(&'static str),
    Action(ShareAction),
}

/// Mapping from platform key to descriptor.
#[derive(Debug, Clone, Default)]
pub struct PlatformRegistry {
    entries: HashMap<String, PlatformDescriptor>,
}

impl PlatformRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in platform.
    pub fn builtin() -> Self {
        let entries = BUILTIN_PLATFORMS
            .iter()
            .map(|&(key, name, fontawesome, icomoon, color, behavior)| {
                let icons = IconSet::new(fontawesome, icomoon);
                let descriptor = match behavior {
                    Builtin::Url(pattern) => {
                        PlatformDescriptor::url(name, icons, color, UrlTemplate::pattern(pattern))
                    }
                    Builtin::Action(action) => PlatformDescriptor::action(name, icons, color, action),
                };
                (key.to_string(), descriptor)
            })
            .collect();
        Self { entries }
    }

    /// Merge caller descriptors; they replace built-ins on key collision.
    pub fn merge<I>(&mut self, custom: I)
    where
        I: IntoIterator<Item = (String, PlatformDescriptor)>,
    {
        self.entries.extend(custom);
    }

    /// Register or overwrite a descriptor.
    pub fn insert(&mut self, key: impl Into<String>, descriptor: PlatformDescriptor) {
        self.entries.insert(key.into(), descriptor);
    }

    pub fn get(&self, key: &str) -> Option<&PlatformDescriptor> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ShareBehavior;

    #[test]
    fn test_builtin_entries() {
        let registry = PlatformRegistry::builtin();
        assert_eq!(registry.len(), 12);

        let facebook = registry.get("facebook").unwrap();
        assert_eq!(facebook.name, "Facebook");
        assert_eq!(facebook.color, "#1877f2");
        match &facebook.behavior {
            ShareBehavior::Url(template) => assert_eq!(
                template.render("https://x.io/p", "T"),
                "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fx.io%2Fp"
            ),
            other => panic!("unexpected behavior: {other:?}"),
        }

        assert!(matches!(
            registry.get("print").unwrap().behavior,
            ShareBehavior::Action(ShareAction::Print)
        ));
    }

    #[test]
    fn test_whatsapp_joins_title_and_url() {
        let registry = PlatformRegistry::builtin();
        let ShareBehavior::Url(template) = &registry.get("whatsapp").unwrap().behavior else {
            panic!("whatsapp should be a URL platform");
        };
        assert_eq!(template.render("https://a.b", "Read"), "https://wa.me/?text=Read%20https%3A%2F%2Fa.b");
    }

    #[test]
    fn test_merge_overrides_builtin() {
        let mut registry = PlatformRegistry::builtin();
        registry.merge([(
            "facebook".to_string(),
            PlatformDescriptor::action("FB", IconSet::default(), "#000", ShareAction::Copy),
        )]);

        assert_eq!(registry.len(), 12);
        assert_eq!(registry.get("facebook").unwrap().name, "FB");
    }

    #[test]
    fn test_keys_sorted() {
        let mut registry = PlatformRegistry::new();
        registry.insert("b", PlatformDescriptor::action("B", IconSet::default(), "", ShareAction::Copy));
        registry.insert("a", PlatformDescriptor::action("A", IconSet::default(), "", ShareAction::Print));
        assert_eq!(registry.keys(), vec!["a", "b"]);
    }
}
