// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leads console CLI.
//!
//! Terminal front end over the leads API client: login and session
//! persistence, lead capture and listing, status timelines, WhatsApp
//! outreach messages, and spreadsheet import/export.

use clap::{Parser, Subcommand, ValueEnum};
use leads_client::models::{
    CreateLeadRequest, ExportFilters, Lead, LeadFilters, LeadHistoryResponse, LeadStatus, Session,
    UpdateLeadRequest, UserRole,
};
use leads_client::phone::{self, countries, PhoneEditor};
use leads_client::{whatsapp, Config, LeadsClient, SessionStore};
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "leads", version, about = "Console client for the leads management API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session for later commands
    Login { email: String, password: String },
    /// Revoke the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// List partners
    Partners,
    /// List leads, filtered and paginated
    List {
        /// Free-text search over name, email, and phone
        #[arg(long)]
        search: Option<String>,
        /// Funnel stage: NEW, FIRST_CONTACT, RESPONDED, NO_RESPONSE, WON, LOST
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Show one lead with its status and contact timelines
    Show { id: String },
    /// Capture a new lead
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Phone number; mask literals and stray characters are ignored
        #[arg(long)]
        phone: String,
        /// Country of the phone number, as ISO code or name
        #[arg(long)]
        country: Option<String>,
        #[arg(long, default_value = "")]
        school: String,
        #[arg(long, default_value = "")]
        city: String,
        /// Create even when the backend flags a duplicate
        #[arg(long)]
        ignore_duplicates: bool,
    },
    /// Edit fields of a lead
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Country for --phone, as ISO code or name
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        school: Option<String>,
        #[arg(long)]
        city: Option<String>,
    },
    /// Move a lead to another funnel stage (MASTER only)
    SetStatus {
        id: String,
        /// NEW, FIRST_CONTACT, RESPONDED, NO_RESPONSE, WON, LOST
        status: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a lead (MASTER only)
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Generate the outreach message and WhatsApp link for a lead (MASTER only)
    Message { id: String },
    /// Export the filtered leads to a spreadsheet in the current directory
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Xlsx)]
        format: ExportFormat,
        #[arg(long)]
        partner: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        school: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Upload a spreadsheet and preview what an import would create
    ImportPreview { file: PathBuf },
    /// Confirm a previewed import
    ImportConfirm {
        import_id: String,
        /// Skip rows that match an existing lead instead of failing them
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        ignore_duplicates: bool,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

// default_value_t renders the default through Display
impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let store = Arc::new(SessionStore::open(config.session_file.clone()));
    let client = LeadsClient::new(&config, store.clone());

    match cli.command {
        Command::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            println!("Logged in as {} ({})", email, session.user.role.as_str());
        }

        Command::Logout => {
            // Local session is discarded whether or not the backend call lands
            if let Err(error) = client.logout().await {
                tracing::warn!(%error, "Logout request failed, session discarded anyway");
            }
            println!("Logged out");
        }

        Command::Whoami => {
            let session = require_session(&store)?;
            match session.user.role {
                UserRole::Master => println!("MASTER"),
                UserRole::Partner => {
                    let name = client
                        .current_partner()
                        .await
                        .map(|partner| partner.name)
                        .unwrap_or_default();
                    if name.is_empty() {
                        println!("PARTNER");
                    } else {
                        println!("PARTNER • {}", name);
                    }
                }
            }
        }

        Command::Partners => {
            require_session(&store)?;
            let partners = client.partners().await?;
            for partner in &partners {
                let marker = if partner.is_active { "" } else { "  (inativo)" };
                println!("{}  {}{}", partner.id, partner.name, marker);
            }
            println!("{} partner(s)", partners.len());
        }

        Command::List {
            search,
            status,
            page,
            page_size,
        } => {
            require_session(&store)?;
            let filters = LeadFilters {
                search,
                status: parse_status_opt(status)?,
                page: Some(page),
                page_size: Some(page_size.unwrap_or(config.page_size)),
            };
            let response = client.leads(&filters).await?;
            for lead in &response.items {
                println!("{}  [{}]  {}", lead.id, lead.status.label(), lead.student_name);
                println!(
                    "      {} • {} • {} • {}",
                    lead.email,
                    phone::format_lead_phone(&lead.phone_e164, &lead.phone_country),
                    lead.school,
                    lead.city
                );
            }
            println!(
                "Mostrando {} de {} leads",
                response.items.len(),
                response.pagination.total
            );
        }

        Command::Show { id } => {
            require_session(&store)?;
            let (lead, history) = tokio::try_join!(client.lead(&id), client.lead_history(&id))?;
            print_lead_details(&lead);
            print_history(&history);
        }

        Command::Create {
            name,
            email,
            phone,
            country,
            school,
            city,
            ignore_duplicates,
        } => {
            let session = require_session(&store)?;
            let partner_id = partner_for_write(&session)?;
            let iso2 = match country {
                Some(value) => resolve_country(&value)?,
                None => countries::resolve_iso2(&config.default_country).unwrap_or("BR"),
            };
            let mut editor = PhoneEditor::new(iso2);
            editor.handle_input(&phone, None);
            let payload = CreateLeadRequest {
                partner_id,
                student_name: name,
                email,
                phone_country: iso2.to_string(),
                phone_national: editor.digits().to_string(),
                school,
                city,
                ignore_duplicates: Some(ignore_duplicates),
            };
            let lead = client.create_lead(&payload).await?;
            println!("Created lead {}", lead.id);
            print_lead_details(&lead);
        }

        Command::Update {
            id,
            name,
            email,
            phone,
            country,
            school,
            city,
        } => {
            require_session(&store)?;
            if country.is_some() && phone.is_none() {
                anyhow::bail!("--country only applies together with --phone");
            }
            let mut payload = UpdateLeadRequest {
                student_name: name,
                email,
                school,
                city,
                ..UpdateLeadRequest::default()
            };
            if let Some(raw) = phone {
                let iso2 = match country {
                    Some(value) => resolve_country(&value)?.to_string(),
                    // Keep the stored country when it is one we know how
                    // to format, same as the edit form does
                    None => {
                        let current = client.lead(&id).await?;
                        if countries::by_iso2(&current.phone_country).is_some() {
                            current.phone_country
                        } else {
                            "BR".to_string()
                        }
                    }
                };
                let mut editor = PhoneEditor::new(&iso2);
                editor.handle_input(&raw, None);
                payload.phone_national = Some(editor.digits().to_string());
                payload.phone_country = Some(iso2);
            }
            let lead = client.update_lead(&id, &payload).await?;
            println!("Dados alterados com sucesso.");
            print_lead_details(&lead);
        }

        Command::SetStatus { id, status, note } => {
            let session = require_session(&store)?;
            require_master(&session)?;
            let status = LeadStatus::from_str(&status).map_err(anyhow::Error::msg)?;
            let payload = UpdateLeadRequest {
                status: Some(status),
                note,
                ..UpdateLeadRequest::default()
            };
            let lead = client.update_lead(&id, &payload).await?;
            println!("{}  [{}]", lead.id, lead.status.label());
        }

        Command::Delete { id, yes } => {
            let session = require_session(&store)?;
            require_master(&session)?;
            if !yes && !confirm_delete()? {
                return Ok(());
            }
            client.delete_lead(&id).await?;
            println!("Lead {} excluido.", id);
        }

        Command::Message { id } => {
            let session = require_session(&store)?;
            require_master(&session)?;
            let response = client.generate_message(&id).await?;
            println!("{} • {}", response.channel, response.to_address);
            println!();
            println!("{}", response.message);
            println!();
            println!(
                "{}",
                whatsapp::wa_me_link(&response.to_address, &response.message)
            );
        }

        Command::Export {
            format,
            partner,
            status,
            school,
            city,
            search,
        } => {
            require_session(&store)?;
            let filters = ExportFilters {
                partner_id: partner,
                status: parse_status_opt(status)?,
                school,
                city,
                search,
            };
            let bytes = match format {
                ExportFormat::Xlsx => client.export_leads_xlsx(&filters).await?,
                ExportFormat::Csv => client.export_leads_csv(&filters).await?,
            };
            let file_name = format!(
                "leads-export-{}.{}",
                chrono::Utc::now().format("%Y-%m-%d"),
                format.extension()
            );
            std::fs::write(&file_name, &bytes)?;
            println!("Wrote {} ({} bytes)", file_name, bytes.len());
        }

        Command::ImportPreview { file } => {
            let session = require_session(&store)?;
            let partner_id = partner_for_write(&session)?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let lower = file_name.to_lowercase();
            if !lower.ends_with(".xls") && !lower.ends_with(".xlsx") {
                anyhow::bail!("Selecione um arquivo .xls ou .xlsx.");
            }
            let bytes = std::fs::read(&file)?;
            let preview = client
                .preview_import_xls(&file_name, bytes, partner_id.as_deref())
                .await?;

            println!("Preview da importação {}", preview.import_id);
            println!(
                "Total: {} | Válidas: {} | Inválidas: {}",
                preview.total_rows, preview.valid_rows, preview.invalid_rows
            );
            for row in preview.annotated_rows() {
                let mut line = format!(
                    "  Linha {}: {} • {} • {} • {} • {}",
                    row.row_number, row.student_name, row.email, row.phone, row.school, row.city
                );
                if row.is_duplicate {
                    let fields: Vec<&str> =
                        row.duplicate_fields.iter().map(|f| f.as_str()).collect();
                    line.push_str(&format!("  [duplicado: {}]", fields.join(", ")));
                }
                if let Some(error) = &row.error {
                    line.push_str(&format!("  [{}]", error));
                }
                println!("{}", line);
            }
            for item in preview.validation_errors() {
                println!("  Linha {}: {}", item.row_number, item.error);
            }
            if preview.has_duplicates() {
                println!(
                    "Existem leads duplicados no preview: {} linha(s).",
                    preview.duplicate_rows
                );
            }
            println!("To apply: leads import-confirm {}", preview.import_id);
        }

        Command::ImportConfirm {
            import_id,
            ignore_duplicates,
        } => {
            require_session(&store)?;
            let result = client
                .confirm_import(&import_id, Some(ignore_duplicates))
                .await?;
            println!(
                "Importacao {}: {} sucesso(s), {} erro(s).",
                result.status, result.success_rows, result.error_rows
            );
        }
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Session and role guards
// ─────────────────────────────────────────────────────────────────────────────

fn require_session(store: &SessionStore) -> anyhow::Result<Session> {
    store
        .current()
        .filter(|session| session.is_authenticated())
        .ok_or_else(|| anyhow::anyhow!("no active session, run `leads login <email> <password>`"))
}

fn require_master(session: &Session) -> anyhow::Result<()> {
    if session.user.role != UserRole::Master {
        anyhow::bail!("Apenas MASTER");
    }
    Ok(())
}

/// Partner scope for writes. MASTER operators create unscoped; PARTNER
/// operators always write under their own partner.
fn partner_for_write(session: &Session) -> anyhow::Result<Option<String>> {
    if session.user.role == UserRole::Master {
        return Ok(None);
    }
    match session.user.partner_id.clone().filter(|id| !id.is_empty()) {
        Some(partner_id) => Ok(Some(partner_id)),
        None => anyhow::bail!("Partner do usuario nao encontrado."),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Input helpers
// ─────────────────────────────────────────────────────────────────────────────

fn resolve_country(value: &str) -> anyhow::Result<&'static str> {
    countries::resolve_iso2(value).ok_or_else(|| anyhow::anyhow!("unknown country '{}'", value))
}

fn parse_status_opt(value: Option<String>) -> anyhow::Result<Option<LeadStatus>> {
    value
        .map(|raw| LeadStatus::from_str(&raw).map_err(anyhow::Error::msg))
        .transpose()
}

fn confirm_delete() -> anyhow::Result<bool> {
    print!("Deseja realmente excluir este lead? [s/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "s" || answer == "sim")
}

// ─────────────────────────────────────────────────────────────────────────────
// Output
// ─────────────────────────────────────────────────────────────────────────────

fn print_lead_details(lead: &Lead) {
    println!("{}", lead.student_name);
    println!("  Status:   {}", lead.status.label());
    println!("  Email:    {}", lead.email);
    println!(
        "  Telefone: {}",
        phone::format_lead_phone(&lead.phone_e164, &lead.phone_country)
    );
    println!("  Escola:   {}", lead.school);
    println!("  Cidade:   {}", lead.city);
    println!("  Criado:   {}", format_date(&lead.created_at));
}

fn print_history(history: &LeadHistoryResponse) {
    println!();
    println!("Histórico de status");
    if history.status_history.is_empty() {
        println!("  Sem alterações registradas.");
    }
    for item in &history.status_history {
        println!(
            "  {} → {}",
            item.old_status.label(),
            item.new_status.label()
        );
        println!("    {}", item.note.as_deref().unwrap_or("Sem observação"));
        println!(
            "    {} • {}",
            item.changed_by_user.name,
            format_date(&item.created_at)
        );
    }

    println!();
    println!("Contatos");
    if history.contact_events.is_empty() {
        println!("  Sem contatos registrados.");
    }
    for item in &history.contact_events {
        println!("  {} • {}", item.channel, item.to_address);
        println!("    {}", item.message_rendered);
        let outcome = if item.success {
            "Sucesso".to_string()
        } else {
            format!("Falha: {}", item.error_reason.as_deref().unwrap_or("sem motivo"))
        };
        println!("    {} • {}", outcome, format_date(&item.created_at));
    }
}

/// Timestamps come over the wire as RFC 3339; anything else is shown as is.
fn format_date(iso: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(iso)
        .map(|date| date.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|_| iso.to_string())
}

fn init_logging() {
    // Logs go to stderr so command output stays clean on stdout
    let format = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("leads_client=info".parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .with(format)
        .init();
}
