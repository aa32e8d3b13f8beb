//! OAuth consent screen reports and redirect-URI remediation scripts

use crate::probe::{Brand, IapClient, ProbeResult, ProjectInfo, ServiceDescriptor};
use crate::report::apis::render_relevant_apis;
use crate::report::Report;

/// Redirect URI the hosting platform requires
const REQUIRED_REDIRECT_URI: &str = "https://app.base44.com/api/apps/auth/callback";
/// Site origins that may also need to be authorized
const SITE_ORIGINS: &[&str] = &["https://nonamebar.it", "https://nonamebar.it/auth/callback"];

fn credentials_console_url(project_id: &str) -> String {
    format!(
        "https://console.cloud.google.com/apis/credentials?project={}",
        project_id
    )
}

/// OAuth configuration check: brand listing plus the manual fix walkthrough
pub fn render_oauth_check(
    report: &mut Report,
    project_id: &str,
    brands: ProbeResult<Vec<Brand>>,
    project: ProbeResult<ProjectInfo>,
) {
    report.banner("🔐 VERIFICA CONFIGURAZIONE OAUTH 2.0");
    report.line(format!("Progetto: {}", project_id));
    report.blank();

    report.section("📋 OAuth Consent Screen Configuration");
    match brands {
        ProbeResult::Found(brands) if !brands.is_empty() => {
            report.line(format!(
                "✅ Trovati {} OAuth consent screen(s):",
                brands.len()
            ));
            report.blank();
            for brand in brands {
                report.line(format!("   Brand Name: {}", brand.name));
                report.line(format!("   Support Email: {}", brand.support_email));
                report.line(format!(
                    "   Application Title: {}",
                    if brand.application_title.is_empty() {
                        "N/A".to_string()
                    } else {
                        brand.application_title
                    }
                ));
                report.blank();
            }
        }
        ProbeResult::Found(_) => {
            report.line("⚠️  Nessun OAuth consent screen configurato");
        }
        ProbeResult::PermissionDenied => {
            report.line("⚠️  Status: 403");
            report.line("   IAP API potrebbe non essere abilitata");
        }
        other => {
            report.handle_failure(other);
        }
    }
    report.blank();

    report.section("🔑 OAuth 2.0 Client IDs");
    report.line("⚠️  Per visualizzare i client OAuth esistenti, accedi a:");
    report.line(format!("   {}", credentials_console_url(project_id)));
    report.blank();
    report.line("📌 REDIRECT URI CHE DEVE ESSERE CONFIGURATO:");
    report.line(format!("   {}", REQUIRED_REDIRECT_URI));
    report.blank();
    report.line("📌 POTREBBERO ESSERE NECESSARI ANCHE:");
    for origin in SITE_ORIGINS {
        report.line(format!("   {}", origin));
    }
    report.line("   http://localhost:3000/auth/callback (per sviluppo)");
    report.blank();

    report.banner("🔍 Istruzioni per Risolvere l'Errore");
    report.blank();
    report.line("Per risolvere l'errore 'redirect_uri_mismatch', segui questi passi:");
    report.blank();
    report.line("1. Vai alla Google Cloud Console:");
    report.line(format!("   {}", credentials_console_url(project_id)));
    report.blank();
    report.line("2. Cerca 'OAuth 2.0 Client IDs' e clicca sul client esistente");
    report.line("   (o creane uno nuovo se non esiste)");
    report.blank();
    report.line("3. Nella sezione 'Authorized redirect URIs', aggiungi:");
    report.line(format!("   ✓ {}", REQUIRED_REDIRECT_URI));
    for origin in SITE_ORIGINS {
        report.line(format!("   ✓ {}", origin));
    }
    report.blank();
    report.line("4. Clicca 'SAVE'");
    report.blank();
    report.line("5. Attendi 5-10 minuti per la propagazione delle modifiche");
    report.blank();
    report.line("6. Riprova l'accesso");
    report.blank();

    if let ProbeResult::Found(info) = project {
        report.line(format!("📋 Project Number: {}", info.project_number));
        report.line(format!("📋 Project ID: {}", project_id));
        report.blank();
    }
}

/// Detailed OAuth inspection: brand, client listing attempts, relevant APIs
/// and the redirect-URI analysis
pub fn render_oauth_inspection(
    report: &mut Report,
    project_id: &str,
    brands: ProbeResult<Vec<Brand>>,
    iap_clients: Option<ProbeResult<Vec<IapClient>>>,
    services: ProbeResult<Vec<ServiceDescriptor>>,
) {
    report.banner("🔍 ISPEZIONE DETTAGLIATA CONFIGURAZIONE OAUTH");
    report.line(format!("Progetto: {}", project_id));
    report.blank();

    report.section("1️⃣  OAUTH CONSENT SCREEN / BRAND");
    match brands {
        ProbeResult::Found(brands) if !brands.is_empty() => {
            let brand = &brands[0];
            report.line("✅ Brand configurato:");
            report.line(format!("   Name: {}", brand.name));
            report.line(format!("   Application Title: {}", brand.application_title));
            report.line(format!("   Support Email: {}", brand.support_email));
            report.line(format!("   Org Internal Only: {}", brand.org_internal_only));
        }
        ProbeResult::Found(_) => {
            report.line("❌ Nessun brand trovato - DEVI crearlo!");
        }
        other => {
            report.handle_failure(other);
        }
    }
    report.blank();

    report.section("2️⃣  TENTATIVO DI LISTARE CLIENT OAUTH");
    match iap_clients {
        Some(result) => {
            report.line("Tentativo IAP Clients...");
            if let Some(clients) = report.handle_failure(result) {
                if clients.is_empty() {
                    report.line("⚠️  Nessun client IAP registrato");
                } else {
                    report.line("✅ Risposta ricevuta:");
                    for client in clients {
                        report.line(format!(
                            "   • {} ({})",
                            client.display_name,
                            client.client_id()
                        ));
                    }
                }
            }
        }
        None => {
            report.line("⏭️  Saltato (nessun brand su cui cercare client)");
        }
    }
    report.blank();

    report.section("3️⃣  API ABILITATE RILEVANTI");
    if let Some(services) = report.handle_failure(services) {
        render_relevant_apis(
            report,
            &services,
            &[
                ("IAM", "iam.googleapis.com"),
                ("IAP", "iap.googleapis.com"),
                ("Cloud Identity", "cloudidentity.googleapis.com"),
                ("OAuth2", "oauth2.googleapis.com"),
                ("Service Management", "servicemanagement.googleapis.com"),
            ],
        );
    }
    report.blank();

    report.banner("🔴 ANALISI ERRORE: redirect_uri_mismatch");
    report.blank();
    report.line("L'errore dice:");
    report.line(format!("  \"redirect_uri={}\"", REQUIRED_REDIRECT_URI));
    report.blank();
    report.line("Questo significa che quando Google OAuth prova a reindirizzare l'utente");
    report.line("a questo URL, NON lo trova nella lista degli Authorized redirect URIs");
    report.line("del tuo OAuth Client.");
    report.blank();

    report.banner("✅ COSA DEVI VERIFICARE MANUALMENTE");
    report.blank();
    report.line("Dato che non posso vedere i tuoi client OAuth via API,");
    report.line("DEVI controllare manualmente:");
    report.blank();
    report.line("1. Vai a:");
    report.line(format!("   {}", credentials_console_url(project_id)));
    report.blank();
    report.line("2. Guarda la sezione 'OAuth 2.0 Client IDs'");
    report.blank();
    report.line("3. Per ogni client di tipo 'Web application', controlla:");
    report.line("   📍 Authorized redirect URIs: ⚠️  CRITICO!");
    report.line("      DEVE contenere ESATTAMENTE:");
    report.line(format!("      • {}", REQUIRED_REDIRECT_URI));
    report.blank();
    report.line("4. Se NON c'è questo URI, clicca '+ ADD URI' e aggiungilo");
    report.line("5. Clicca SAVE");
    report.line("6. Aspetta 5-10 minuti");
    report.line("7. Riprova il login");
    report.blank();

    // Google exposes no public API to create or edit standard OAuth clients,
    // so the report can only point at the console.
    report.line("⚠️  LIMITAZIONE API GOOGLE:");
    report.line("Google non fornisce un'API pubblica per modificare client OAuth 2.0");
    report.line("via codice per motivi di sicurezza.");
    report.blank();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brand(title: &str) -> Brand {
        Brand {
            name: "projects/123/brands/456".to_string(),
            application_title: title.to_string(),
            support_email: "owner@example.com".to_string(),
            org_internal_only: false,
        }
    }

    #[test]
    fn test_check_with_brand_present() {
        let mut report = Report::new();
        render_oauth_check(
            &mut report,
            "demo",
            ProbeResult::Found(vec![brand("Demo App")]),
            ProbeResult::Missing,
        );
        let text = report.into_string();
        assert!(text.contains("Trovati 1 OAuth consent screen(s)"));
        assert!(text.contains("redirect_uri_mismatch"));
        assert!(text.contains("console.cloud.google.com/apis/credentials?project=demo"));
    }

    #[test]
    fn test_check_with_no_brand() {
        let mut report = Report::new();
        render_oauth_check(
            &mut report,
            "demo",
            ProbeResult::Found(vec![]),
            ProbeResult::Missing,
        );
        assert!(report
            .as_str()
            .contains("Nessun OAuth consent screen configurato"));
    }

    #[test]
    fn test_inspection_flags_missing_brand() {
        let mut report = Report::new();
        render_oauth_inspection(
            &mut report,
            "demo",
            ProbeResult::Found(vec![]),
            None,
            ProbeResult::PermissionDenied,
        );
        let text = report.into_string();
        assert!(text.contains("Nessun brand trovato - DEVI crearlo!"));
        assert!(text.contains("Saltato"));
        assert!(text.contains("403 Forbidden"));
    }
}
