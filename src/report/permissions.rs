//! Service account permission reports

use crate::probe::{
    classify_service, has_owner_or_editor, Brand, ProbeResult, ProjectInfo, ProjectSummary,
    RoleAssignments, ServiceCategory, ServiceDescriptor,
};
use crate::report::Report;

/// Role listing plus relevant-API summary, as the permission check prints it
pub fn render_permissions(
    report: &mut Report,
    project_id: &str,
    client_email: &str,
    roles: ProbeResult<RoleAssignments>,
    services: ProbeResult<Vec<ServiceDescriptor>>,
) {
    report.banner("🔍 VERIFICA PERMESSI SERVICE ACCOUNT");
    report.line(format!("Account: {}", client_email));
    report.line(format!("Project: {}", project_id));
    report.blank();

    report.line("📋 Recupero policy IAM del progetto...");
    match roles {
        ProbeResult::Found(assignments) => {
            if assignments.roles.is_empty() {
                report.line("⚠️  Nessun ruolo trovato per questo service account");
            } else {
                report.line("✅ Ruoli assegnati a questo service account:");
                for role in &assignments.roles {
                    report.line(format!("   • {}", role));
                }
                if has_owner_or_editor(&assignments.roles) {
                    report.blank();
                    report.line("✅ Permessi sufficienti per modifiche progetto");
                } else {
                    report.blank();
                    report.line("⚠️  Potrebbe servire ruolo Owner o Editor");
                }
            }
        }
        other => {
            report.line("⚠️  Impossibile recuperare IAM policy:");
            report.handle_failure(other);
        }
    }
    report.blank();

    report.line("🔧 Verifica API disponibili...");
    if let Some(services) = report.handle_failure(services) {
        report.line(format!("✅ API abilitate: {}", services.len()));
        report.blank();
        report.line("📦 API rilevanti:");
        for service in &services {
            match classify_service(&service.name) {
                ServiceCategory::Other | ServiceCategory::Core => {}
                _ => report.line(format!("   ✓ {}", service.title)),
            }
        }
    }
    report.blank();

    report.banner("✅ CONNESSIONE ATTIVA");
    report.blank();
    report.line("Il service account è autenticato e pronto per essere utilizzato.");
    report.line("Puoi procedere con le operazioni sul progetto GCP.");
    report.blank();
}

/// The post-cleanup access tests: IAM policy, project details, project listing
/// and consent screen, each with its wait-and-retry hint on 403
pub fn render_access_tests(
    report: &mut Report,
    project_id: &str,
    client_email: &str,
    roles: ProbeResult<RoleAssignments>,
    project: ProbeResult<ProjectInfo>,
    projects: ProbeResult<Vec<ProjectSummary>>,
    brands: ProbeResult<Vec<Brand>>,
) {
    report.banner("🧪 TEST ACCESSO MIGLIORATO DOPO PULIZIA RUOLI");
    report.line(format!("Progetto: {}", project_id));
    report.line(format!("Service Account: {}", client_email));
    report.blank();

    report.section("TEST 1: IAM Policy");
    match roles {
        ProbeResult::Found(assignments) => {
            report.line("✅ SUCCESS! Ora posso vedere IAM Policy!");
            report.blank();
            report.line(format!("Ruoli per {}:", assignments.member));
            if assignments.roles.is_empty() {
                report.line("   (nessun ruolo)");
            }
            for role in &assignments.roles {
                report.line(format!("   ✓ {}", role));
            }
        }
        ProbeResult::PermissionDenied => {
            report.line("❌ Ancora 403 - Aspetta qualche minuto per propagazione");
        }
        other => {
            report.handle_failure(other);
        }
    }
    report.blank();

    report.section("TEST 2: Project Details");
    match project {
        ProbeResult::Found(info) => {
            report.line("✅ SUCCESS! Ora posso vedere Project Details!");
            report.line(format!("   Project Name: {}", info.name));
            report.line(format!("   Project Number: {}", info.project_number));
            report.line(format!("   Project ID: {}", info.project_id));
            report.line(format!("   State: {}", info.lifecycle_state));
        }
        ProbeResult::PermissionDenied => {
            report.line("❌ Ancora 403 - Aspetta qualche minuto per propagazione");
        }
        other => {
            report.handle_failure(other);
        }
    }
    report.blank();

    report.section("TEST 3: Lista Progetti (per vedere altri progetti)");
    match projects {
        ProbeResult::Found(projects) if !projects.is_empty() => {
            report.line("✅ SUCCESS! Posso listare i progetti!");
            report.blank();
            report.line(format!("Trovati {} progetto/i:", projects.len()));
            for proj in projects.iter().take(10) {
                report.line(format!("   • {} ({})", proj.name, proj.project_id));
            }
            if projects.len() > 10 {
                report.line(format!("   ... e altri {} progetti", projects.len() - 10));
            }
        }
        ProbeResult::Found(_) => {
            report.line("ℹ️  Nessun progetto visibile");
        }
        ProbeResult::PermissionDenied => {
            report.line("❌ 403 - Non posso listare progetti");
            report.line("   (Normale se il service account vive in un solo progetto)");
        }
        other => {
            report.handle_failure(other);
        }
    }
    report.blank();

    report.section("TEST 4: OAuth Consent Screen");
    match brands {
        ProbeResult::Found(brands) => {
            report.line("✅ OAuth Brand accessibile");
            if let Some(brand) = brands.first() {
                report.line(format!("   App: {}", brand.application_title));
                report.line(format!("   Email: {}", brand.support_email));
            } else {
                report.line("   (nessun brand configurato)");
            }
        }
        other => {
            report.handle_failure(other);
        }
    }
    report.blank();

    report.banner("📊 SUMMARY");
    report.blank();
    report.line("✅ Se vedi 'SUCCESS' sopra: Ottimo! Ora ho più accesso");
    report.line("❌ Se vedi ancora 403: Aspetta 5-10 minuti e riprova questo comando");
    report.blank();
    report.line("⚠️  LIMITAZIONE CONFERMATA:");
    report.line("   Client OAuth NON sono accessibili via API");
    report.line("   Google blocca per sicurezza");
    report.blank();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions_with_roles() {
        let mut report = Report::new();
        render_permissions(
            &mut report,
            "demo",
            "sa@demo.iam.gserviceaccount.com",
            ProbeResult::Found(RoleAssignments {
                member: "serviceAccount:sa@demo.iam.gserviceaccount.com".to_string(),
                roles: vec!["roles/editor".to_string(), "roles/storage.admin".to_string()],
            }),
            ProbeResult::Found(vec![]),
        );
        let text = report.into_string();
        assert!(text.contains("roles/editor"));
        assert!(text.contains("Permessi sufficienti"));
    }

    #[test]
    fn test_permissions_without_roles() {
        let mut report = Report::new();
        render_permissions(
            &mut report,
            "demo",
            "sa@demo.iam.gserviceaccount.com",
            ProbeResult::Found(RoleAssignments {
                member: "serviceAccount:sa@demo.iam.gserviceaccount.com".to_string(),
                roles: vec![],
            }),
            ProbeResult::PermissionDenied,
        );
        let text = report.into_string();
        assert!(text.contains("Nessun ruolo trovato"));
        assert!(text.contains("403 Forbidden"));
    }

    #[test]
    fn test_access_tests_suggest_waiting_on_403() {
        let mut report = Report::new();
        render_access_tests(
            &mut report,
            "demo",
            "sa@demo.iam.gserviceaccount.com",
            ProbeResult::PermissionDenied,
            ProbeResult::PermissionDenied,
            ProbeResult::PermissionDenied,
            ProbeResult::Found(vec![]),
        );
        let text = report.into_string();
        assert!(text.contains("Aspetta qualche minuto"));
        assert!(text.contains("nessun brand configurato"));
    }
}
