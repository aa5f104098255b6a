use clientdesk_core::{
    applicable_sections, ClientQuery, ClientRecord, ClientSnapshot, Constitution, FieldValue,
    Settings,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// --- Request types ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ApplyChangeRequest {
    /// The record being edited, as a JSON object keyed by persisted field names (e.g. "pan", "date_of_incorporation_birth"). An empty string starts from a new record.
    record: String,
    /// Name of the field that changed, e.g. "pan", "tan", "date_of_incorporation_birth"
    field: String,
    /// New value: a string for text, select and date inputs, a boolean for checkboxes
    value: FieldValue,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ApplicableSectionsRequest {
    /// Constitution as persisted, e.g. "Company", "Partnership Firm". Unknown values get the baseline sections.
    constitution: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct SearchClientsRequest {
    /// JSON array of client records to search. Rows without a display_name are ignored.
    records: String,
    /// Case-insensitive substring of display name, legal name or PAN
    search: Option<String>,
    /// Exact constitution to keep, e.g. "LLP"
    constitution: Option<String>,
    /// Keep only active (true) or inactive (false) clients
    is_active: Option<bool>,
    /// Keep only direct (true) or indirect (false) clients
    is_direct: Option<bool>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct RedactClientRequest {
    /// The client record as a JSON object
    record: String,
}

// --- Server ---

#[derive(Clone)]
pub struct ClientdeskServer {
    settings: Settings,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ClientdeskServer {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Create an empty client record with the creation-form defaults")]
    fn new_client(&self) -> Result<CallToolResult, McpError> {
        respond(to_json(&self.settings.new_client()))
    }

    #[tool(
        description = "Apply one form field change to a client record and return the whole updated record as JSON. Changing pan, tan or date_of_incorporation_birth also rewrites the suggested portal credentials (it_portal_user_id, it_portal_user_id_tds, password_26as, password_ais_tis). Feed the returned record into the next call."
    )]
    fn apply_change(
        &self,
        Parameters(req): Parameters<ApplyChangeRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!(field = %req.field, "apply_change");
        respond(apply_change_json(
            &self.settings,
            &req.record,
            &req.field,
            req.value,
        ))
    }

    #[tool(
        description = "List the detail-view sections (tabs) that apply to a constitution. Returns {constitution, label, recognized, sections: [{key, label}]} in display order."
    )]
    fn applicable_sections(
        &self,
        Parameters(req): Parameters<ApplicableSectionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(sections_json(&req.constitution))
    }

    #[tool(description = "List the recognized constitutions in form order")]
    fn list_constitutions(&self) -> Result<CallToolResult, McpError> {
        let names = Constitution::ALL
            .iter()
            .map(Constitution::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        Ok(CallToolResult::success(vec![Content::text(names)]))
    }

    #[tool(
        description = "Filter a list of client records and return slim summaries (no credentials) in input order"
    )]
    fn search_clients(
        &self,
        Parameters(req): Parameters<SearchClientsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let query = ClientQuery {
            search: req.search,
            constitution: req.constitution,
            is_active: req.is_active,
            is_direct: req.is_direct,
        };
        respond(search_json(&self.settings, &req.records, &query))
    }

    #[tool(
        description = "Return a client record with password fields replaced by bullets, unless credentials are configured to be revealed"
    )]
    fn redact_client(
        &self,
        Parameters(req): Parameters<RedactClientRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            parse_record(&req.record)
                .and_then(|record| to_json(&self.settings.present(&record))),
        )
    }

    #[tool(description = "Get the derivation and section rules that govern client records")]
    fn get_rules(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            clientdesk_core::rules::RULES,
        )]))
    }
}

#[tool_handler]
impl ServerHandler for ClientdeskServer {
    fn get_info(&self) -> ServerInfo {
        let instructions = format!(
            "{}\n\n## Client Record Rules\n{}",
            INSTRUCTIONS,
            clientdesk_core::rules::RULES
        );
        ServerInfo {
            instructions: Some(instructions.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

const INSTRUCTIONS: &str = r#"Clientdesk keeps client records of a chartered-accountancy practice consistent while they are edited. It stores nothing: every call carries the record it works on.

## Editing workflow
1. Start with `new_client` (or an existing record).
2. For every field the user changes, call `apply_change` with the latest record and use the returned record from then on. Never patch derived credentials yourself.
3. Call `applicable_sections` with the record's constitution to decide which sections to show or fill in.
4. Use `redact_client` before echoing a record back to the user."#;

// --- Helpers ---

fn respond(result: Result<String, String>) -> Result<CallToolResult, McpError> {
    Ok(match result {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => CallToolResult::error(vec![Content::text(e)]),
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Serialization error: {}", e))
}

fn parse_record(raw: &str) -> Result<ClientRecord, String> {
    serde_json::from_str(raw).map_err(|e| format!("Invalid client record JSON: {}", e))
}

fn apply_change_json(
    settings: &Settings,
    raw: &str,
    field: &str,
    value: FieldValue,
) -> Result<String, String> {
    let record = if raw.trim().is_empty() {
        settings.new_client()
    } else {
        parse_record(raw)?
    };
    to_json(&clientdesk_core::apply_change(&record, field, value))
}

fn sections_json(raw: &str) -> Result<String, String> {
    let constitution = Constitution::parse(raw);
    let sections: Vec<serde_json::Value> = applicable_sections(&constitution)
        .into_iter()
        .map(|s| json!({ "key": s.key(), "label": s.label() }))
        .collect();
    to_json(&json!({
        "constitution": constitution.as_str(),
        "label": constitution.label(),
        "recognized": constitution.is_recognized(),
        "sections": sections,
    }))
}

fn search_json(settings: &Settings, raw: &str, query: &ClientQuery) -> Result<String, String> {
    let snapshot = ClientSnapshot::from_json(raw)
        .map_err(|e| format!("Invalid client list JSON: {}", e))?;
    let summaries: Vec<_> = snapshot
        .summaries(query)
        .into_iter()
        .map(|s| settings.present_summary(s))
        .collect();
    debug!(total = snapshot.len(), matched = summaries.len(), "search_clients");
    to_json(&summaries)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protocol; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if std::env::args().nth(1).as_deref() == Some("init") {
        return Ok(init::run()?);
    }

    let settings = clientdesk_core::read_settings();
    info!(
        home = %clientdesk_core::home_dir().display(),
        reveal_credentials = settings.reveal_credentials,
        "starting clientdesk MCP server"
    );

    let service = ClientdeskServer::new(settings)
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "MCP server error"))?;
    service.waiting().await?;
    Ok(())
}

/// `clientdesk-mcp init`: register the server with the MCP clients set up for
/// the current project and seed a settings file.
mod init {
    use std::fmt;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use clientdesk_core::Settings;
    use serde_json::json;
    use tracing::{debug, info};

    const SERVER_NAME: &str = "clientdesk";

    #[derive(Debug, thiserror::Error)]
    pub enum InitError {
        #[error("cannot locate the clientdesk-mcp binary: {0}")]
        Binary(#[source] std::io::Error),

        #[error("{path}: {source}")]
        Io {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },

        #[error("{path} is not a valid MCP config, fix or remove it first: {source}")]
        Json {
            path: PathBuf,
            #[source]
            source: serde_json::Error,
        },

        #[error("{path} is not valid TOML, fix or remove it first: {source}")]
        Toml {
            path: PathBuf,
            #[source]
            source: toml_edit::TomlError,
        },

        #[error(transparent)]
        Settings(#[from] clientdesk_core::Error),
    }

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> InitError + '_ {
        move |source| InitError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum McpClient {
        ClaudeCode,
        Codex,
    }

    impl McpClient {
        pub const ALL: [McpClient; 2] = [McpClient::ClaudeCode, McpClient::Codex];

        pub fn name(self) -> &'static str {
            match self {
                McpClient::ClaudeCode => "Claude Code",
                McpClient::Codex => "Codex",
            }
        }

        /// Project-local file the client reads its MCP servers from.
        pub fn config_path(self, project: &Path) -> PathBuf {
            match self {
                McpClient::ClaudeCode => project.join(".mcp.json"),
                McpClient::Codex => project.join(".codex").join("config.toml"),
            }
        }

        /// Claude Code is always registered. Codex only when the project
        /// already has a Codex config or the CLI is installed.
        fn is_set_up(self, project: &Path) -> bool {
            match self {
                McpClient::ClaudeCode => true,
                McpClient::Codex => self.config_path(project).exists() || on_path("codex"),
            }
        }

        /// Merge the server entry into the client's config, keeping other
        /// entries. An unparseable config is left untouched.
        pub fn register(self, project: &Path, binary: &str) -> Result<PathBuf, InitError> {
            let path = self.config_path(project);
            let existing = match fs::read_to_string(&path) {
                Ok(raw) => Some(raw),
                Err(e) if e.kind() == ErrorKind::NotFound => None,
                Err(e) => return Err(io_error(&path)(e)),
            };
            let existing = existing.as_deref();

            let updated = match self {
                McpClient::ClaudeCode => {
                    merge_mcp_json(existing, binary).map_err(|source| InitError::Json {
                        path: path.clone(),
                        source,
                    })?
                }
                McpClient::Codex => {
                    merge_codex_toml(existing, binary).map_err(|source| InitError::Toml {
                        path: path.clone(),
                        source,
                    })?
                }
            };

            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).map_err(io_error(dir))?;
            }
            fs::write(&path, updated).map_err(io_error(&path))?;
            Ok(path)
        }
    }

    fn on_path(name: &str) -> bool {
        std::env::var_os("PATH").is_some_and(|paths| {
            std::env::split_paths(&paths)
                .any(|dir| dir.join(name).is_file() || dir.join(format!("{name}.exe")).is_file())
        })
    }

    fn merge_mcp_json(existing: Option<&str>, binary: &str) -> Result<String, serde_json::Error> {
        let mut root: serde_json::Value = match existing.filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => serde_json::from_str(raw)?,
            None => json!({}),
        };
        let Some(object) = root.as_object_mut() else {
            return Err(serde::de::Error::custom("expected a JSON object"));
        };
        let servers = object.entry("mcpServers").or_insert_with(|| json!({}));
        if !servers.is_object() {
            *servers = json!({});
        }
        servers[SERVER_NAME] = json!({
            "type": "stdio",
            "command": binary,
            "args": [],
        });
        serde_json::to_string_pretty(&root)
    }

    fn merge_codex_toml(
        existing: Option<&str>,
        binary: &str,
    ) -> Result<String, toml_edit::TomlError> {
        let mut doc: toml_edit::DocumentMut = existing.unwrap_or_default().parse()?;
        if !doc.contains_table("mcp_servers") {
            doc["mcp_servers"] = toml_edit::Item::Table(toml_edit::Table::new());
        }
        let mut server = toml_edit::Table::new();
        server.insert("command", toml_edit::value(binary));
        server.insert("args", toml_edit::value(toml_edit::Array::new()));
        doc["mcp_servers"][SERVER_NAME] = toml_edit::Item::Table(server);
        Ok(doc.to_string())
    }

    /// What `init` changed.
    #[derive(Debug, Default)]
    pub struct Report {
        pub registered: Vec<(McpClient, PathBuf)>,
        pub settings_created: Option<PathBuf>,
    }

    impl fmt::Display for Report {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for (client, path) in &self.registered {
                writeln!(f, "registered with {}: {}", client.name(), path.display())?;
            }
            match &self.settings_created {
                Some(path) => write!(f, "wrote default settings: {}", path.display()),
                None => write!(f, "kept existing settings"),
            }
        }
    }

    pub fn init_project(
        project: &Path,
        binary: &str,
        settings_path: &Path,
    ) -> Result<Report, InitError> {
        let mut report = Report::default();
        for client in McpClient::ALL {
            if !client.is_set_up(project) {
                debug!(client = client.name(), "not installed, skipping");
                continue;
            }
            let path = client.register(project, binary)?;
            info!(client = client.name(), path = %path.display(), "registered MCP server");
            report.registered.push((client, path));
        }

        if !settings_path.exists() {
            clientdesk_core::write_settings_to(settings_path, &Settings::default())?;
            report.settings_created = Some(settings_path.to_path_buf());
        }
        Ok(report)
    }

    pub fn run() -> Result<(), InitError> {
        let binary = std::env::current_exe()
            .and_then(|exe| exe.canonicalize())
            .map_err(InitError::Binary)?;
        let project = std::env::current_dir().map_err(io_error(Path::new(".")))?;
        let report = init_project(
            &project,
            &binary.to_string_lossy(),
            &clientdesk_core::settings_path(),
        )?;
        println!("{report}");
        Ok(())
    }
}
