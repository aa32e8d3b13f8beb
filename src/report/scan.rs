//! Full project scan, access verification and API key test reports

use crate::probe::{
    ApiKeyTestResult, BucketSummary, FirebaseInfo, FunctionSummary, InstanceSummary,
    ObjectSummary, ProbeResult, ServiceAccountInfo, ServiceDescriptor,
};
use crate::report::Report;

/// Header plus storage check, as the access verification script prints it
pub fn render_verify(
    report: &mut Report,
    project_id: &str,
    client_email: &str,
    buckets: ProbeResult<Vec<(BucketSummary, ProbeResult<Vec<ObjectSummary>>)>>,
) {
    report.line(format!("🔐 Service Account: {}", client_email));
    report.line(format!("📋 Project ID: {}", project_id));
    report.blank();
    report.line("✅ Autenticazione riuscita!");
    report.blank();

    report.line("🗂️  Verifica accesso Cloud Storage...");
    if let Some(buckets) = report.handle_failure(buckets) {
        report.line("✅ Accesso a Cloud Storage confermato");
        if buckets.is_empty() {
            report.line("ℹ️  Nessun bucket trovato");
        } else {
            report.line(format!("📦 Trovati {} bucket(s):", buckets.len()));
            for (bucket, _) in &buckets {
                report.line(format!("   - {}", bucket.name));
            }
        }
    }
    report.blank();

    report.banner("✅ CONNESSIONE STABILITA CON SUCCESSO");
    report.blank();
    report.line("Il service account ha accesso completo al progetto:");
    report.line(format!("   Project: {}", project_id));
    report.line(format!("   Account: {}", client_email));
    report.blank();
    report.line("Puoi ora utilizzare tutte le risorse GCP disponibili");
    report.line("per questo service account.");
}

/// Everything the full scan found, section by section
#[allow(clippy::too_many_arguments)]
pub fn render_full_scan(
    report: &mut Report,
    project_id: &str,
    client_email: &str,
    buckets: ProbeResult<Vec<(BucketSummary, ProbeResult<Vec<ObjectSummary>>)>>,
    services: ProbeResult<Vec<ServiceDescriptor>>,
    firebase: ProbeResult<FirebaseInfo>,
    functions: ProbeResult<Vec<FunctionSummary>>,
    instances: ProbeResult<Vec<InstanceSummary>>,
    accounts: ProbeResult<Vec<ServiceAccountInfo>>,
) {
    report.banner("🔍 SCANSIONE COMPLETA PROGETTO GOOGLE CLOUD");
    report.line(format!("Progetto: {}", project_id));
    report.line(format!("Service Account: {}", client_email));
    report.blank();

    report.section("📦 CLOUD STORAGE");
    if let Some(buckets) = report.handle_failure(buckets) {
        if buckets.is_empty() {
            report.line("ℹ️  Nessun bucket trovato");
        } else {
            report.line(format!("✅ Trovati {} bucket(s):", buckets.len()));
            for (bucket, objects) in buckets {
                report.blank();
                report.line(format!("   Bucket: {}", bucket.name));
                report.line(format!("   Location: {}", bucket.location));
                report.line(format!("   Storage Class: {}", bucket.storage_class));
                report.line(format!("   Created: {}", bucket.time_created));
                if let ProbeResult::Found(objects) = objects {
                    if objects.is_empty() {
                        report.line("   Files: (vuoto)");
                    } else {
                        report.line("   Files (first 5):");
                        for obj in objects {
                            report.line(format!("      - {} ({} bytes)", obj.name, obj.size));
                        }
                    }
                }
            }
        }
    }
    report.blank();

    report.section("🔧 API ABILITATE");
    if let Some(services) = report.handle_failure(services) {
        report.line(format!("✅ {} API abilitate:", services.len()));
        for service in services.iter().take(20) {
            report.line(format!("   • {}", service.title));
        }
        if services.len() > 20 {
            report.line(format!("   ... e altre {} API", services.len() - 20));
        }
    }
    report.blank();

    report.section("🔥 FIREBASE / FIRESTORE");
    match firebase {
        ProbeResult::Found(info) => {
            report.line("✅ Firebase abilitato:");
            report.line(format!("   Project Number: {}", info.project_number));
            report.line(format!("   Display Name: {}", info.display_name));
            if let Some(db) = info.realtime_database {
                report.line(format!("   Realtime Database: {}", db));
            }
            if let Some(bucket) = info.storage_bucket {
                report.line(format!("   Storage Bucket: {}", bucket));
            }
        }
        other => {
            report.line("ℹ️  Firebase non configurato o non accessibile");
            report.handle_failure(other);
        }
    }
    report.blank();

    report.section("⚡ CLOUD FUNCTIONS");
    if let Some(functions) = report.handle_failure(functions) {
        if functions.is_empty() {
            report.line("ℹ️  Nessuna Cloud Function trovata");
        } else {
            report.line(format!("✅ Trovate {} function(s):", functions.len()));
            for func in functions {
                report.blank();
                report.line(format!("   Function: {}", func.name));
                report.line(format!("   Runtime: {}", func.runtime));
                report.line(format!("   Status: {}", func.status));
                report.line(format!(
                    "   Trigger: {}",
                    func.trigger_url.as_deref().unwrap_or("N/A")
                ));
            }
        }
    }
    report.blank();

    report.section("💻 COMPUTE ENGINE");
    if let Some(instances) = report.handle_failure(instances) {
        if instances.is_empty() {
            report.line("ℹ️  Nessuna VM trovata");
        } else {
            for vm in &instances {
                report.blank();
                report.line(format!("   VM: {}", vm.name));
                report.line(format!("   Zone: {}", vm.zone));
                report.line(format!("   Status: {}", vm.status));
                report.line(format!("   Machine Type: {}", vm.machine_type));
            }
            report.blank();
            report.line(format!("✅ Totale VMs: {}", instances.len()));
        }
    }
    report.blank();

    report.section("👤 SERVICE ACCOUNTS");
    if let Some(accounts) = report.handle_failure(accounts) {
        if accounts.is_empty() {
            report.line("ℹ️  Nessun service account trovato");
        } else {
            report.line(format!("✅ Trovati {} service account(s):", accounts.len()));
            for acc in accounts {
                let marker = if acc.email == client_email {
                    " (QUESTO)"
                } else {
                    ""
                };
                report.line(format!("   • {}{}", acc.email, marker));
            }
        }
    }
    report.blank();

    report.banner("✅ SCANSIONE COMPLETATA");
    report.blank();
    report.line("Il progetto è stato scansionato completamente.");
    report.line("Tutti i servizi accessibili sono stati elencati sopra.");
    report.blank();
}

/// API key test results, one numbered section per endpoint
pub fn render_api_key_tests(
    report: &mut Report,
    masked_key: &str,
    project_id: &str,
    results: &[ApiKeyTestResult],
) {
    report.banner("🔑 Testing API Key");
    report.line(format!("Key: {}", masked_key));
    report.line(format!("Project: {}", project_id));
    report.blank();

    for (idx, result) in results.iter().enumerate() {
        report.line(format!("{}️⃣  Testing {}...", idx + 1, result.endpoint));
        match result.status {
            Some(code) => report.line(format!("   Status: {}", code)),
            None => report.line("   Status: (nessuna risposta)"),
        }
        if result.ok {
            report.line(format!("   ✅ Success! {}", result.detail));
        } else {
            report.line(format!("   ❌ Error: {}", result.detail));
        }
        report.blank();
    }

    report.banner("📊 Test Summary");
    report.blank();
    report.line("Se la chiave ha funzionato, vedresti messaggi ✅ sopra.");
    report.line("Altrimenti, potrebbero servire credenziali diverse.");
    report.blank();
}
