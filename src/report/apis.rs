//! Enabled-API listing report, grouped by display category

use crate::probe::{classify_service, service_enabled, ServiceDescriptor, KEY_SERVICES};
use crate::probe::{ProbeResult, ServiceCategory};
use crate::report::Report;
use std::collections::BTreeMap;

/// The categorized listing, as the API inventory script prints it
pub fn render_api_listing(
    report: &mut Report,
    project_id: &str,
    services: ProbeResult<Vec<ServiceDescriptor>>,
) {
    report.banner("🔧 LISTA COMPLETA API ABILITATE");
    report.line(format!("Progetto: {}", project_id));
    report.blank();

    let Some(services) = report.handle_failure(services) else {
        return;
    };

    if services.is_empty() {
        report.line("ℹ️  Nessuna API abilitata trovata");
        return;
    }

    report.line(format!("✅ Trovate {} API abilitate:", services.len()));

    // Group by category label; BTreeMap keeps the categories sorted
    let mut categories: BTreeMap<&'static str, Vec<&ServiceDescriptor>> = BTreeMap::new();
    for service in &services {
        categories
            .entry(classify_service(&service.name).label())
            .or_default()
            .push(service);
    }

    for (label, mut entries) in categories {
        report.blank();
        report.section(label);
        entries.sort_by(|a, b| a.title.cmp(&b.title));
        for service in entries {
            report.line(format!("   ✓ {}", service.title));
            report.line(format!("     {}", service.name));
        }
    }

    report.blank();
    report.banner("✅ LISTA COMPLETA");
    render_key_services(report, &services);
}

/// The "key services" enablement summary at the bottom of the listing
pub fn render_key_services(report: &mut Report, services: &[ServiceDescriptor]) {
    report.blank();
    report.line("📌 SERVIZI CHIAVE:");
    for (label, api_name) in KEY_SERVICES {
        let status = if service_enabled(services, api_name) {
            "✅ ABILITATA"
        } else {
            "❌ NON ABILITATA"
        };
        report.line(format!("   {}: {}", label, status));
    }
}

/// Per-API enablement attempt results, one line each
pub fn render_enablement(report: &mut Report, results: &[(String, ProbeResult<()>)]) {
    for (label, result) in results {
        match result {
            ProbeResult::Found(()) => report.line(format!("Abilitazione {}... ✅", label)),
            ProbeResult::PermissionDenied => report.line(format!(
                "Abilitazione {}... ⚠️  (403 - permessi insufficienti)",
                label
            )),
            ProbeResult::Missing => {
                report.line(format!("Abilitazione {}... ⚠️  (API sconosciuta)", label))
            }
            ProbeResult::Warning { status, detail } => {
                match status {
                    Some(code) => {
                        report.line(format!("Abilitazione {}... ⚠️  (status: {})", label, code))
                    }
                    None => report.line(format!("Abilitazione {}... ❌", label)),
                }
                if !detail.is_empty() {
                    report.line(format!("   {}", detail));
                }
            }
        }
    }
}

/// Relevant-API checklist used by the OAuth inspection
pub fn render_relevant_apis(
    report: &mut Report,
    services: &[ServiceDescriptor],
    relevant: &[(&str, &str)],
) {
    for (label, api_name) in relevant {
        let marker = if service_enabled(services, api_name) {
            "✅"
        } else {
            "❌"
        };
        report.line(format!("   {} {}", marker, label));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(name: &str, title: &str) -> ServiceDescriptor {
        ServiceDescriptor {
            name: name.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_listing_groups_by_category() {
        let mut report = Report::new();
        render_api_listing(
            &mut report,
            "demo",
            ProbeResult::Found(vec![
                service("firestore.googleapis.com", "Cloud Firestore API"),
                service("compute.googleapis.com", "Compute Engine API"),
            ]),
        );
        let text = report.into_string();
        assert!(text.contains(ServiceCategory::Firebase.label()));
        assert!(text.contains(ServiceCategory::Compute.label()));
        assert!(text.contains("Cloud Firestore API"));
        assert!(text.contains("Firestore: ✅ ABILITATA"));
        assert!(text.contains("IAM: ❌ NON ABILITATA"));
    }

    #[test]
    fn test_empty_listing_is_explicit() {
        let mut report = Report::new();
        render_api_listing(&mut report, "demo", ProbeResult::Found(vec![]));
        assert!(report.as_str().contains("Nessuna API abilitata trovata"));
    }
}
