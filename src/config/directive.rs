//! `@op:argument` directives.

use super::fetch::Fetcher;
use super::resolve::{resolve_references, MissingPolicy};
use super::{ConfigError, Store};

/// A directive line with its `@` marker removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `load:<uri-or-path>`, argument not yet resolved.
    Load(String),
}

/// Output of a successfully executed directive.
#[derive(Debug)]
pub struct Loaded {
    /// The argument after variable expansion.
    pub uri: String,
    pub bytes: Vec<u8>,
}

impl Directive {
    /// Parses `<op>[:<argument>]`, splitting at the first `:` only.
    pub fn parse(line: &str) -> Result<Self, ConfigError> {
        let (op, argument) = line.split_once(':').unwrap_or((line, ""));
        match op.trim() {
            "load" => Ok(Directive::Load(argument.trim().to_string())),
            other => Err(ConfigError::IllegalDirective(other.to_string())),
        }
    }

    /// Resolves the argument against `store` and runs the directive.
    ///
    /// Unresolved references in the argument always expand to nothing, so
    /// `@load:${OPTIONAL_INCLUDE}` fails with [`ConfigError::EmptyValue`] when
    /// the variable is unset instead of fetching the literal token.
    pub fn execute(&self, store: &Store, fetcher: &dyn Fetcher) -> Result<Loaded, ConfigError> {
        match self {
            Directive::Load(raw) => {
                let uri = resolve_references(raw, store, MissingPolicy::Empty)
                    .trim()
                    .to_string();
                if uri.is_empty() {
                    return Err(ConfigError::EmptyValue);
                }
                let bytes = fetcher.fetch(&uri)?;
                Ok(Loaded { uri, bytes })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Records requested URIs and answers with a fixed body.
    #[derive(Debug, Default)]
    struct RecordingFetcher {
        requested: Mutex<Vec<String>>,
    }

    impl Fetcher for RecordingFetcher {
        fn fetch(&self, uri: &str) -> Result<Vec<u8>, ConfigError> {
            self.requested.lock().unwrap().push(uri.to_string());
            Ok(b"k=v".to_vec())
        }
    }

    fn store() -> Store {
        Store::with_environment(HashMap::<String, String>::new())
    }

    #[test]
    fn test_parse_load() {
        assert_eq!(
            Directive::parse("load:conf/a.ini").unwrap(),
            Directive::Load("conf/a.ini".into())
        );
    }

    #[test]
    fn test_parse_keeps_url_colons() {
        assert_eq!(
            Directive::parse("load:http://host:8080/a.ini").unwrap(),
            Directive::Load("http://host:8080/a.ini".into())
        );
    }

    #[test]
    fn test_parse_without_argument() {
        assert_eq!(Directive::parse("load").unwrap(), Directive::Load(String::new()));
    }

    #[test]
    fn test_parse_illegal_directive() {
        let result = Directive::parse("include:a.ini");
        assert!(matches!(
            result,
            Err(ConfigError::IllegalDirective(ref op)) if op == "include"
        ));
    }

    #[test]
    fn test_parse_illegal_directive_without_argument() {
        for line in ["include:", "include", " include : "] {
            assert!(
                matches!(
                    Directive::parse(line),
                    Err(ConfigError::IllegalDirective(ref op)) if op == "include"
                ),
                "{line:?}"
            );
        }
    }

    #[test]
    fn test_execute_resolves_argument() {
        let mut store = store();
        store.set("conf_dir", "/etc/app");
        let fetcher = RecordingFetcher::default();

        let loaded = Directive::Load("${conf_dir}/extra.ini".into())
            .execute(&store, &fetcher)
            .unwrap();

        assert_eq!(loaded.uri, "/etc/app/extra.ini");
        assert_eq!(loaded.bytes, b"k=v");
        assert_eq!(*fetcher.requested.lock().unwrap(), vec!["/etc/app/extra.ini"]);
    }

    #[test]
    fn test_execute_empty_argument() {
        let fetcher = RecordingFetcher::default();

        let result = Directive::Load("${missing}".into()).execute(&store(), &fetcher);

        assert!(matches!(result, Err(ConfigError::EmptyValue)));
        assert!(fetcher.requested.lock().unwrap().is_empty());
    }

    #[test]
    fn test_execute_partial_argument_still_fetched() {
        let fetcher = RecordingFetcher::default();

        let loaded = Directive::Load("${missing}/extra.ini".into())
            .execute(&store(), &fetcher)
            .unwrap();

        assert_eq!(loaded.uri, "/extra.ini");
    }
}
