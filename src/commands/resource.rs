//! Actions shared by the group and user commands.

use clap::{Args, ValueEnum};
use serde_json::Value;

use groupstore_core::{Document, PatchValue, ResourcePatch, StoreClient, StoreError, Version};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Patch options for `edit`
#[derive(Args)]
pub struct PatchArgs {
    /// Set a key; the value is parsed as JSON, or taken as a string (can be repeated)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Remove a key (can be repeated)
    #[arg(long = "unset", value_name = "KEY")]
    pub unset: Vec<String>,
}

impl PatchArgs {
    pub fn to_patch(&self) -> Result<ResourcePatch, CommandError> {
        let mut patch = ResourcePatch::new();
        for entry in &self.set {
            let (key, raw) = entry.split_once('=').ok_or_else(|| {
                CommandError::InvalidArgument(format!("expected KEY=VALUE, got '{}'", entry))
            })?;
            if key.is_empty() {
                return Err(CommandError::InvalidArgument(format!(
                    "empty key in '{}'",
                    entry
                )));
            }
            patch.insert(key, PatchValue::Set(parse_value(raw)));
        }
        for key in &self.unset {
            patch.insert(key.as_str(), PatchValue::Delete);
        }
        Ok(patch)
    }
}

/// Parses a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Parses a `--data` argument, which must be a JSON object.
pub fn parse_document(raw: &str) -> Result<Document, CommandError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CommandError::InvalidArgument(
            "--data must be a JSON object".to_string(),
        )),
        Err(e) => Err(CommandError::InvalidArgument(format!(
            "--data is not valid JSON: {}",
            e
        ))),
    }
}

pub async fn list(client: &StoreClient, url: &str) -> Result<(), CommandError> {
    for name in client.list(url).await? {
        println!("{}", name);
    }
    Ok(())
}

pub async fn show(
    client: &StoreClient,
    url: &str,
    format: &OutputFormat,
) -> Result<(), CommandError> {
    let resource = client.read(url, None).await?;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&resource)?);
        }
        OutputFormat::Text => {
            println!("Version: {}", resource.version);
            println!();
            println!("{}", serde_json::to_string_pretty(&resource.data)?);
        }
    }
    Ok(())
}

pub async fn create(
    client: &StoreClient,
    url: &str,
    data: Option<&str>,
) -> Result<(), CommandError> {
    let data = data.map(parse_document).transpose()?;
    let version = client.create(url, data.as_ref()).await?;
    print_written("Created", url, version);
    Ok(())
}

pub async fn replace(
    client: &StoreClient,
    url: &str,
    version: &str,
    data: &str,
) -> Result<(), CommandError> {
    let data = parse_document(data)?;
    let version = client.replace(url, &Version::new(version), &data).await?;
    print_written("Replaced", url, version);
    Ok(())
}

pub async fn edit(
    client: &StoreClient,
    url: &str,
    patch: &PatchArgs,
    if_match: Option<&str>,
) -> Result<(), CommandError> {
    let patch = patch.to_patch()?;
    if patch.is_empty() {
        return Err(CommandError::InvalidArgument(
            "nothing to change; pass --set or --unset".to_string(),
        ));
    }

    let expected = if_match.map(Version::new);
    let version = client.edit(url, &patch, expected.as_ref()).await?;
    print_written("Updated", url, version);
    Ok(())
}

pub async fn delete(
    client: &StoreClient,
    url: &str,
    if_match: Option<&str>,
) -> Result<(), CommandError> {
    let version = if_match.map(Version::new);
    client.remove(url, version.as_ref()).await?;
    println!("Deleted {}", url);
    Ok(())
}

fn print_written(action: &str, url: &str, version: Option<Version>) {
    match version {
        Some(v) => println!("{} {} (version {})", action, url, v),
        None => println!("{} {}", action, url),
    }
}

/// Errors from resource commands
#[derive(Debug)]
pub enum CommandError {
    Store(StoreError),
    InvalidArgument(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Store(e) if e.is_conflict() => write!(
                f,
                "{}\nThe resource was changed by someone else; read it again and retry.",
                e
            ),
            CommandError::Store(e) => write!(f, "{}", e),
            CommandError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CommandError::Io(e) => write!(f, "I/O error: {}", e),
            CommandError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Store(e) => Some(e),
            CommandError::Io(e) => Some(e),
            CommandError::Json(e) => Some(e),
            CommandError::InvalidArgument(_) => None,
        }
    }
}

impl From<StoreError> for CommandError {
    fn from(e: StoreError) -> Self {
        CommandError::Store(e)
    }
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        CommandError::Io(e)
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(e: serde_json::Error) -> Self {
        CommandError::Json(e)
    }
}
