use anyhow::Result;
use tracing_subscriber::EnvFilter;

use formgate::security::generate_form_token;
use formgate::{ContactForm, FormGateway, FormServiceKind, FormTiming};

/// Configuration check for deployments: resolves the environment, reports
/// what is missing for the selected provider, and (for the mock provider)
/// pushes one sample submission through the full pipeline.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let gateway = FormGateway::from_env();
    let status = gateway.service().validate_config();

    if !status.configured {
        for key in &status.missing {
            tracing::error!(key = %key, "required setting is not set");
        }
        anyhow::bail!(
            "form service '{}' is not fully configured",
            status.service_type
        );
    }

    tracing::info!(service = %status.service_type, "form service configuration is complete");

    if status.service_type == FormServiceKind::Mock {
        let form = ContactForm {
            name: "Configuration Check".to_string(),
            email: "check@example.com".to_string(),
            company: String::new(),
            project_type: "Consultation / Technical Audit".to_string(),
            message: "Sample submission generated by the configuration check binary.".to_string(),
            website: None,
            csrf_token: generate_form_token(),
        };
        let timing = FormTiming {
            loaded_at_ms: 0,
            submitted_at_ms: 10_000,
        };

        let result = gateway.submit_contact(&form, timing).await;
        tracing::info!(success = result.success, "sample mock submission finished");
    }

    Ok(())
}
