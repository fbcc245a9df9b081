//! Function chain evaluator.
//!
//! A placeholder `{{a.b.c(arg)}}` evaluates as `a(b(c(arg)))`: the chain is
//! walked from its last function to its first, each step transforming the
//! value produced by the previous one. Unknown function names pass the value
//! through unchanged.

use super::error::FnError;
use super::path::get_path;
use super::random::{generate_random_value, RandomOptions};
use super::scanner::PlaceholderMatch;
use super::value::Value;
use crate::config::{get_config, EngineConfig};
use crate::environment::{find_variable, VariableStore};
use crate::history::ResponseStore;
use crate::host::{BaseDirectory, Clock, FilePicker, FileSystem, LocalFileSystem, NoFilePicker, SystemClock};
use base64::{engine::general_purpose, Engine as _};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Template functions known to the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionName {
    ReadTextFile,
    ReadFile,
    Base64,
    OpenFile,
    Timestamp,
    Md5,
    Sha256,
    Get,
    Env,
    Random,
}

impl FunctionName {
    /// Resolves a name or its short alias. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "readTextFile" | "rtf" => Some(FunctionName::ReadTextFile),
            "readFile" | "rf" => Some(FunctionName::ReadFile),
            "base64" | "b64" => Some(FunctionName::Base64),
            "openFile" | "of" => Some(FunctionName::OpenFile),
            "timestamp" | "ts" => Some(FunctionName::Timestamp),
            "md5" => Some(FunctionName::Md5),
            "sha256" => Some(FunctionName::Sha256),
            "get" | "g" => Some(FunctionName::Get),
            "env" => Some(FunctionName::Env),
            "random" => Some(FunctionName::Random),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionName::ReadTextFile => "readTextFile",
            FunctionName::ReadFile => "readFile",
            FunctionName::Base64 => "base64",
            FunctionName::OpenFile => "openFile",
            FunctionName::Timestamp => "timestamp",
            FunctionName::Md5 => "md5",
            FunctionName::Sha256 => "sha256",
            FunctionName::Get => "get",
            FunctionName::Env => "env",
            FunctionName::Random => "random",
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluates placeholder matches against injected host capabilities.
///
/// Variables and stored responses are required; the filesystem, file picker,
/// clock and random source default to the real host implementations and can
/// be replaced for tests.
pub struct Evaluator {
    variables: Arc<dyn VariableStore>,
    responses: Arc<dyn ResponseStore>,
    file_system: Arc<dyn FileSystem>,
    file_picker: Arc<dyn FilePicker>,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
    config: EngineConfig,
}

impl Evaluator {
    /// Creates an evaluator using the global configuration.
    pub fn new(variables: Arc<dyn VariableStore>, responses: Arc<dyn ResponseStore>) -> Self {
        Self {
            variables,
            responses,
            file_system: Arc::new(LocalFileSystem::new()),
            file_picker: Arc::new(NoFilePicker),
            clock: Arc::new(SystemClock),
            rng: Mutex::new(StdRng::from_entropy()),
            config: get_config(),
        }
    }

    pub fn with_file_system(mut self, file_system: Arc<dyn FileSystem>) -> Self {
        self.file_system = file_system;
        self
    }

    pub fn with_file_picker(mut self, file_picker: Arc<dyn FilePicker>) -> Self {
        self.file_picker = file_picker;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Seeds the random source, making `random` reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluates one placeholder to its final string.
    ///
    /// # Errors
    ///
    /// Returns [`FnError::InvalidGetParams`] for a malformed `get` argument,
    /// [`FnError::Io`] when a file cannot be read and [`FnError::Store`] when
    /// the variable store fails.
    pub async fn evaluate(&self, placeholder: &PlaceholderMatch) -> Result<String, FnError> {
        log::debug!("evaluating {}", placeholder.text);
        let value = self.evaluate_value(placeholder).await?;
        Ok(value.stringify())
    }

    /// Evaluates one placeholder, returning the final accumulator.
    pub async fn evaluate_value(&self, placeholder: &PlaceholderMatch) -> Result<Value, FnError> {
        let mut value = Value::from(placeholder.argument.clone());

        for name in placeholder.function_chain.iter().rev() {
            let Some(function) = FunctionName::from_name(name) else {
                log::trace!("unknown function {:?}, value passed through", name);
                continue;
            };
            log::trace!("applying {}", function);
            value = self.apply(function, value, &placeholder.collection).await?;
        }

        Ok(value)
    }

    async fn apply(
        &self,
        function: FunctionName,
        value: Value,
        collection: &str,
    ) -> Result<Value, FnError> {
        match function {
            FunctionName::ReadTextFile => {
                let (path, base) = self.file_target(&value);
                let text = self.file_system.read_text_file(&path, base).await?;
                Ok(Value::Text(text))
            }
            FunctionName::ReadFile => {
                let (path, base) = self.file_target(&value);
                let bytes = self.file_system.read_file(&path, base).await?;
                Ok(Value::Bytes(bytes))
            }
            FunctionName::Base64 => Ok(Value::Text(
                general_purpose::STANDARD.encode(value.to_bytes()),
            )),
            FunctionName::OpenFile => match self.file_picker.pick_file("Select file").await {
                Some(path) => Ok(Value::Text(path)),
                None => Ok(value),
            },
            FunctionName::Timestamp => Ok(Value::Text(self.clock.unix_seconds().to_string())),
            FunctionName::Md5 => Ok(Value::Text(format!(
                "{:x}",
                md5::compute(value.to_bytes())
            ))),
            FunctionName::Sha256 => Ok(Value::Text(format!(
                "{:x}",
                Sha256::digest(value.to_bytes())
            ))),
            FunctionName::Get => self.get_from_response(value).await,
            FunctionName::Env => {
                let name = value.stringify();
                match find_variable(self.variables.as_ref(), collection, &name).await? {
                    Some(variable) => Ok(Value::Text(variable.value)),
                    None => {
                        log::debug!("variable {} not found in {}", name, collection);
                        Ok(value)
                    }
                }
            }
            FunctionName::Random => {
                let options = RandomOptions {
                    unix_seconds: self.clock.unix_seconds(),
                    string_length: self.config.random_string_length,
                    local_part_length: self.config.random_local_part_length,
                    default_domain: &self.config.default_email_domain,
                };
                let args = value.to_list();
                let mut rng = self
                    .rng
                    .lock()
                    .map_err(|_| FnError::Store("random source lock poisoned".to_string()))?;
                Ok(Value::Text(generate_random_value(&mut *rng, &args, &options)))
            }
        }
    }

    /// Path and base directory for the file functions.
    ///
    /// A list value is read as `[path, dirName]`; an empty or missing
    /// `dirName` selects the configured default.
    fn file_target(&self, value: &Value) -> (String, BaseDirectory) {
        match value {
            Value::List(items) => {
                let path = items.first().cloned().unwrap_or_default();
                let base = items
                    .get(1)
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(BaseDirectory::from_name)
                    .unwrap_or(self.config.default_base_dir);
                (path, base)
            }
            other => (other.stringify(), self.config.default_base_dir),
        }
    }

    async fn get_from_response(&self, value: Value) -> Result<Value, FnError> {
        let param = value.stringify();
        let parts: Vec<&str> = param.split(',').map(str::trim).collect();
        let [id, path] = parts.as_slice() else {
            return Err(FnError::InvalidGetParams(param));
        };

        let Some(response) = self.responses.latest_response(id).await else {
            log::warn!("no stored response for {}", id);
            return Ok(value);
        };

        let body = response.body();
        let found = body
            .json
            .as_ref()
            .and_then(|json| get_path(json, path))
            .cloned();
        Ok(found.map(Value::Json).unwrap_or(Value::Null))
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Environment, InMemoryStore, Variable, VariableCategory};
    use crate::functions::scanner::scan_placeholders;
    use crate::history::LatestResponses;
    use crate::host::{FixedClock, StaticFilePicker};
    use crate::models::HttpResponse;
    use std::io::Write;

    fn create_evaluator() -> (Evaluator, InMemoryStore, LatestResponses) {
        let store = InMemoryStore::new();
        store.add_environment(Environment::new("c1", "dev").with_id("dev").enabled(true));
        store.add_variable(
            Variable::new("c1", VariableCategory::Environment, "FOO", "bar").in_environment("dev"),
        );

        let history = LatestResponses::new(10);
        let evaluator = Evaluator::new(Arc::new(store.clone()), Arc::new(history.clone()))
            .with_config(EngineConfig::default())
            .with_clock(Arc::new(FixedClock::from_unix(1_700_000_000)))
            .with_seed(42);
        (evaluator, store, history)
    }

    async fn eval(evaluator: &Evaluator, text: &str) -> Result<String, FnError> {
        let matches = scan_placeholders(text, "c1");
        assert_eq!(matches.len(), 1, "expected one placeholder in {}", text);
        evaluator.evaluate(&matches[0]).await
    }

    #[test]
    fn test_function_aliases() {
        assert_eq!(FunctionName::from_name("rtf"), Some(FunctionName::ReadTextFile));
        assert_eq!(FunctionName::from_name("rf"), Some(FunctionName::ReadFile));
        assert_eq!(FunctionName::from_name("b64"), Some(FunctionName::Base64));
        assert_eq!(FunctionName::from_name("of"), Some(FunctionName::OpenFile));
        assert_eq!(FunctionName::from_name("ts"), Some(FunctionName::Timestamp));
        assert_eq!(FunctionName::from_name("g"), Some(FunctionName::Get));
        assert_eq!(FunctionName::from_name("MD5"), None);
    }

    #[tokio::test]
    async fn test_hashes() {
        let (evaluator, _, _) = create_evaluator();
        assert_eq!(
            eval(&evaluator, "{{md5(abc)}}").await.unwrap(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            eval(&evaluator, "{{sha256(abc)}}").await.unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_timestamp_uses_clock() {
        let (evaluator, _, _) = create_evaluator();
        assert_eq!(eval(&evaluator, "{{ts()}}").await.unwrap(), "1700000000");
        assert_eq!(eval(&evaluator, "{{timestamp(ignored)}}").await.unwrap(), "1700000000");
    }

    #[tokio::test]
    async fn test_env_lookup_and_pass_through() {
        let (evaluator, _, _) = create_evaluator();
        assert_eq!(eval(&evaluator, "{{env(FOO)}}").await.unwrap(), "bar");
        assert_eq!(eval(&evaluator, "{{env(MISSING)}}").await.unwrap(), "MISSING");
    }

    #[tokio::test]
    async fn test_unknown_chain_passes_through() {
        let (evaluator, _, _) = create_evaluator();
        assert_eq!(eval(&evaluator, "{{a.b(x)}}").await.unwrap(), "x");
    }

    #[tokio::test]
    async fn test_chain_applies_back_to_front() {
        let (evaluator, _, _) = create_evaluator();
        // env resolves FOO to bar, then md5 hashes "bar".
        let expected = format!("{:x}", md5::compute("bar"));
        assert_eq!(eval(&evaluator, "{{md5.env(FOO)}}").await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_base64_text() {
        let (evaluator, _, _) = create_evaluator();
        assert_eq!(eval(&evaluator, "{{b64(hello)}}").await.unwrap(), "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_read_file_and_base64() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("data.bin")).unwrap();
        file.write_all(&[0xff, 0x00, 0x10]).unwrap();

        let (evaluator, _, _) = create_evaluator();
        let evaluator =
            evaluator.with_file_system(Arc::new(LocalFileSystem::with_root(dir.path())));

        assert_eq!(
            eval(&evaluator, "{{b64.rf(data.bin, desktop)}}").await.unwrap(),
            "/wAQ"
        );
    }

    #[tokio::test]
    async fn test_read_text_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("note.txt"), "from disk").unwrap();

        let (evaluator, _, _) = create_evaluator();
        let evaluator =
            evaluator.with_file_system(Arc::new(LocalFileSystem::with_root(dir.path())));

        assert_eq!(eval(&evaluator, "{{rtf(note.txt)}}").await.unwrap(), "from disk");
        let err = eval(&evaluator, "{{rtf(missing.txt)}}").await.unwrap_err();
        assert!(matches!(err, FnError::Io(_)));
    }

    #[tokio::test]
    async fn test_open_file() {
        let (evaluator, _, _) = create_evaluator();
        // Cancelled picker leaves the value alone.
        assert_eq!(eval(&evaluator, "{{of(default.txt)}}").await.unwrap(), "default.txt");

        let evaluator = evaluator.with_file_picker(Arc::new(StaticFilePicker::new("/tmp/a.txt")));
        assert_eq!(eval(&evaluator, "{{of()}}").await.unwrap(), "/tmp/a.txt");
    }

    #[tokio::test]
    async fn test_get_from_response() {
        let (evaluator, _, history) = create_evaluator();
        let mut response = HttpResponse::new("login", 200);
        response.add_header("Content-Type", "application/json");
        response.set_body(br#"{"data":{"token":"t-1","items":[{"id":3}]}}"#.to_vec());
        history.add(response);

        assert_eq!(eval(&evaluator, "{{get(login, data.token)}}").await.unwrap(), "t-1");
        assert_eq!(eval(&evaluator, "{{g(login, data.items[0].id)}}").await.unwrap(), "3");
        assert_eq!(eval(&evaluator, "{{g(login, data.nope)}}").await.unwrap(), "");
        // No stored response: value unchanged.
        assert_eq!(eval(&evaluator, "{{g(other, a)}}").await.unwrap(), "other,a");
    }

    #[tokio::test]
    async fn test_get_invalid_params() {
        let (evaluator, _, _) = create_evaluator();
        let err = eval(&evaluator, "{{get(login)}}").await.unwrap_err();
        assert_eq!(err, FnError::InvalidGetParams("login".to_string()));

        let err = eval(&evaluator, "{{get(a, b, c)}}").await.unwrap_err();
        assert!(matches!(err, FnError::InvalidGetParams(_)));
    }

    #[tokio::test]
    async fn test_random_is_seeded() {
        let (a, _, _) = create_evaluator();
        let (b, _, _) = create_evaluator();
        assert_eq!(
            eval(&a, "{{random()}}").await.unwrap(),
            eval(&b, "{{random()}}").await.unwrap()
        );

        let email = eval(&a, "{{random(email, corp.test)}}").await.unwrap();
        assert!(email.starts_with("1700000000"));
        assert!(email.ends_with("@corp.test"));
    }

    #[tokio::test]
    async fn test_random_not_cached_between_calls() {
        let (evaluator, _, _) = create_evaluator();
        let first = eval(&evaluator, "{{random()}}").await.unwrap();
        let second = eval(&evaluator, "{{random()}}").await.unwrap();
        assert_ne!(first, second);
    }
}
