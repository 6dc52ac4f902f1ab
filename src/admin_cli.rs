// admin_cli.rs
// Terminal client for the portfolio API: CRUD on every resource, media
// uploads, and the contact inbox, against a running server.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::multipart;
use reqwest::{Client, Method, Response, StatusCode};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "admin-cli")]
#[command(about = "Admin client for the portfolio API")]
#[command(version)]
struct Cli {
    /// Base URL of the running API
    #[arg(long, global = true, default_value = "http://localhost:8080", env = "PORTFOLIO_API_URL")]
    api: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Login, registration and session info")]
    Auth {
        #[command(subcommand)]
        cmd: AuthCommands,
    },

    #[command(about = "The site owner profile (singleton)")]
    About {
        #[command(subcommand)]
        cmd: AboutCommands,
    },

    #[command(about = "Portfolio projects")]
    Projects {
        #[command(subcommand)]
        cmd: CrudCommands,
    },

    #[command(about = "Skills")]
    Skills {
        #[command(subcommand)]
        cmd: CrudCommands,
    },

    #[command(about = "Work experience entries")]
    Experiences {
        #[command(subcommand)]
        cmd: CrudCommands,
    },

    #[command(about = "Certificates")]
    Certificates {
        #[command(subcommand)]
        cmd: CrudCommands,
    },

    #[command(about = "Social links")]
    Socials {
        #[command(subcommand)]
        cmd: SocialCommands,
    },

    #[command(about = "Contact inbox")]
    Contacts {
        #[command(subcommand)]
        cmd: ContactCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    #[command(about = "Log in and cache the token")]
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    #[command(about = "Register the admin account (first run only)")]
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    #[command(about = "Show the logged-in admin")]
    Me,
}

#[derive(Subcommand)]
enum AboutCommands {
    #[command(about = "Print the profile")]
    Show,

    #[command(about = "Create or update the profile")]
    Save {
        /// Text field as key=value (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,
        /// File upload as slot=path (repeatable)
        #[arg(long = "file")]
        files: Vec<String>,
    },
}

#[derive(Subcommand)]
enum CrudCommands {
    List,

    Get {
        id: String,
    },

    Create {
        /// Text field as key=value (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,
        /// File upload as slot=path (repeatable)
        #[arg(long = "file")]
        files: Vec<String>,
    },

    Update {
        id: String,
        #[arg(long = "field")]
        fields: Vec<String>,
        #[arg(long = "file")]
        files: Vec<String>,
    },

    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SocialCommands {
    List,

    Get {
        id: String,
    },

    Create {
        #[arg(long = "field")]
        fields: Vec<String>,
    },

    Update {
        id: String,
        #[arg(long = "field")]
        fields: Vec<String>,
    },

    #[command(about = "Flip a link's visibility on the public site")]
    Toggle {
        id: String,
    },

    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ContactCommands {
    List,

    Get {
        id: String,
    },

    #[command(about = "Mark a message as read")]
    Read {
        id: String,
    },

    #[command(about = "Mark a message as replied")]
    Replied {
        id: String,
    },

    #[command(about = "Inbox counters")]
    Stats,

    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let api = ApiClient::new(cli.api)?;

    match cli.command {
        Commands::Auth { cmd } => run_auth(&api, cmd).await,
        Commands::About { cmd } => run_about(&api, cmd).await,
        Commands::Projects { cmd } => run_crud(&api, "/api/projects", cmd).await,
        Commands::Skills { cmd } => run_crud(&api, "/api/skills", cmd).await,
        Commands::Experiences { cmd } => run_crud(&api, "/api/experiences", cmd).await,
        Commands::Certificates { cmd } => run_crud(&api, "/api/certificates", cmd).await,
        Commands::Socials { cmd } => run_socials(&api, cmd).await,
        Commands::Contacts { cmd } => run_contacts(&api, cmd).await,
    }
}

// ============================================================================
// Command handlers
// ============================================================================

async fn run_auth(api: &ApiClient, cmd: AuthCommands) -> Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let body = serde_json::json!({ "email": email, "password": password });
            let data = api
                .send_json(Method::POST, "/api/auth/login", &body, false)
                .await?;
            cache_token(&data)?;
            print_json(&data);
        }
        AuthCommands::Register {
            name,
            email,
            password,
        } => {
            let body = serde_json::json!({ "name": name, "email": email, "password": password });
            let data = api
                .send_json(Method::POST, "/api/auth/register", &body, false)
                .await?;
            cache_token(&data)?;
            print_json(&data);
        }
        AuthCommands::Me => {
            let data = api.get("/api/auth/me", true).await?;
            print_json(&data);
        }
    }
    Ok(())
}

async fn run_about(api: &ApiClient, cmd: AboutCommands) -> Result<()> {
    match cmd {
        AboutCommands::Show => {
            let data = api.get("/api/about", false).await?;
            print_json(&data);
        }
        AboutCommands::Save { fields, files } => {
            api.send_form(Method::POST, "/api/about", &fields, &files, true)
                .await?;
            // Refetch rather than trusting the mutation response
            let data = api.get("/api/about", false).await?;
            print_json(&data);
        }
    }
    Ok(())
}

async fn run_crud(api: &ApiClient, base: &str, cmd: CrudCommands) -> Result<()> {
    match cmd {
        CrudCommands::List => {
            let data = api.get(base, false).await?;
            print_json(&data);
        }
        CrudCommands::Get { id } => {
            let data = api.get(&format!("{}/{}", base, id), false).await?;
            print_json(&data);
        }
        CrudCommands::Create { fields, files } => {
            api.send_form(Method::POST, base, &fields, &files, true)
                .await?;
            let data = api.get(base, false).await?;
            print_json(&data);
        }
        CrudCommands::Update { id, fields, files } => {
            api.send_form(Method::PUT, &format!("{}/{}", base, id), &fields, &files, true)
                .await?;
            let data = api.get(base, false).await?;
            print_json(&data);
        }
        CrudCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete {}/{}?", base, id))? {
                println!("Aborted");
                return Ok(());
            }
            api.delete(&format!("{}/{}", base, id)).await?;
            let data = api.get(base, false).await?;
            print_json(&data);
        }
    }
    Ok(())
}

async fn run_socials(api: &ApiClient, cmd: SocialCommands) -> Result<()> {
    const BASE: &str = "/api/socials";
    match cmd {
        SocialCommands::List => {
            let data = api.get(BASE, false).await?;
            print_json(&data);
        }
        SocialCommands::Get { id } => {
            let data = api.get(&format!("{}/{}", BASE, id), false).await?;
            print_json(&data);
        }
        SocialCommands::Create { fields } => {
            api.send_form(Method::POST, BASE, &fields, &[], true).await?;
            let data = api.get(BASE, false).await?;
            print_json(&data);
        }
        SocialCommands::Update { id, fields } => {
            api.send_form(Method::PUT, &format!("{}/{}", BASE, id), &fields, &[], true)
                .await?;
            let data = api.get(BASE, false).await?;
            print_json(&data);
        }
        SocialCommands::Toggle { id } => {
            api.send_empty(Method::PATCH, &format!("{}/{}/toggle-visibility", BASE, id))
                .await?;
            let data = api.get(BASE, false).await?;
            print_json(&data);
        }
        SocialCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete {}/{}?", BASE, id))? {
                println!("Aborted");
                return Ok(());
            }
            api.delete(&format!("{}/{}", BASE, id)).await?;
            let data = api.get(BASE, false).await?;
            print_json(&data);
        }
    }
    Ok(())
}

async fn run_contacts(api: &ApiClient, cmd: ContactCommands) -> Result<()> {
    const BASE: &str = "/api/contacts";
    match cmd {
        ContactCommands::List => {
            let data = api.get(BASE, true).await?;
            print_json(&data);
        }
        ContactCommands::Get { id } => {
            let data = api.get(&format!("{}/{}", BASE, id), true).await?;
            print_json(&data);
        }
        ContactCommands::Read { id } => {
            api.send_empty(Method::PATCH, &format!("{}/{}/read", BASE, id))
                .await?;
            let data = api.get(BASE, true).await?;
            print_json(&data);
        }
        ContactCommands::Replied { id } => {
            api.send_empty(Method::PATCH, &format!("{}/{}/replied", BASE, id))
                .await?;
            let data = api.get(BASE, true).await?;
            print_json(&data);
        }
        ContactCommands::Stats => {
            let data = api.get(&format!("{}/stats", BASE), true).await?;
            print_json(&data);
        }
        ContactCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete {}/{}?", BASE, id))? {
                println!("Aborted");
                return Ok(());
            }
            api.delete(&format!("{}/{}", BASE, id)).await?;
            let data = api.get(BASE, true).await?;
            print_json(&data);
        }
    }
    Ok(())
}

// ============================================================================
// HTTP client
// ============================================================================

struct ApiClient {
    base: String,
    http: Client,
}

impl ApiClient {
    fn new(base: String) -> Result<Self> {
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            http: Client::builder().build()?,
        })
    }

    async fn get(&self, path: &str, authed: bool) -> Result<serde_json::Value> {
        let mut req = self.http.get(format!("{}{}", self.base, path));
        if authed {
            req = req.bearer_auth(load_token()?);
        }
        read_response(req.send().await?).await
    }

    async fn delete(&self, path: &str) -> Result<serde_json::Value> {
        let req = self
            .http
            .delete(format!("{}{}", self.base, path))
            .bearer_auth(load_token()?);
        read_response(req.send().await?).await
    }

    async fn send_empty(&self, method: Method, path: &str) -> Result<serde_json::Value> {
        let req = self
            .http
            .request(method, format!("{}{}", self.base, path))
            .bearer_auth(load_token()?);
        read_response(req.send().await?).await
    }

    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: &serde_json::Value,
        authed: bool,
    ) -> Result<serde_json::Value> {
        let mut req = self
            .http
            .request(method, format!("{}{}", self.base, path))
            .json(body);
        if authed {
            req = req.bearer_auth(load_token()?);
        }
        read_response(req.send().await?).await
    }

    /// Send fields and files as a mutation body. With no files attached the
    /// request goes out as JSON; any `--file` switches it to multipart.
    async fn send_form(
        &self,
        method: Method,
        path: &str,
        fields: &[String],
        files: &[String],
        authed: bool,
    ) -> Result<serde_json::Value> {
        let fields = parse_pairs(fields, "--field")?;
        let files = parse_pairs(files, "--file")?;

        if files.is_empty() {
            let body: serde_json::Map<String, serde_json::Value> = fields
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();
            return self
                .send_json(method, path, &serde_json::Value::Object(body), authed)
                .await;
        }

        let mut form = multipart::Form::new();
        for (key, value) in fields {
            form = form.text(key, value);
        }
        for (slot, path) in files {
            let path = PathBuf::from(path);
            let data = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload")
                .to_string();
            form = form.part(slot, multipart::Part::bytes(data).file_name(file_name));
        }

        let mut req = self
            .http
            .request(method, format!("{}{}", self.base, path))
            .multipart(form);
        if authed {
            req = req.bearer_auth(load_token()?);
        }
        read_response(req.send().await?).await
    }
}

async fn read_response(response: Response) -> Result<serde_json::Value> {
    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .await
        .unwrap_or_else(|_| serde_json::json!({ "success": false, "message": "non-JSON response" }));

    if !status.is_success() {
        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("request failed");
        if status == StatusCode::UNAUTHORIZED {
            bail!("{} (run `admin-cli auth login` first)", message);
        }
        bail!("{} ({})", message, status);
    }

    Ok(body)
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_pairs(raw: &[String], flag: &str) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => bail!("{} expects key=value, got '{}'", flag, entry),
        })
        .collect()
}

fn token_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(Path::new(&home).join(".portfolio-admin-token"))
}

fn load_token() -> Result<String> {
    let path = token_path()?;
    let token = std::fs::read_to_string(&path)
        .with_context(|| format!("No cached token at {} (run `admin-cli auth login`)", path.display()))?;
    Ok(token.trim().to_string())
}

fn cache_token(body: &serde_json::Value) -> Result<()> {
    let token = body
        .pointer("/data/token")
        .and_then(|t| t.as_str())
        .context("Response carried no token")?;
    let path = token_path()?;
    std::fs::write(&path, token)?;
    println!("Token cached at {}", path.display());
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{}", value),
    }
}
