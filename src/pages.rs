use std::path::PathBuf;

use anyhow::Context;

/// One-time message rendered into a template's `{{message}}` slot.
#[derive(Debug, Clone)]
pub struct Flash {
    message: String,
    color: &'static str,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            color: "green",
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            color: "red",
        }
    }

    fn to_html(&self) -> String {
        format!(
            r#"<span class="text-{}-500 font-semibold">{}</span>"#,
            self.color, self.message
        )
    }
}

/// Loads templates from the static directory at request time and fills in the
/// flash slot. Rendering says nothing about how a handler answers (inline
/// body vs. redirect); handlers compose the two.
#[derive(Clone)]
pub struct PageRenderer {
    static_dir: PathBuf,
}

impl PageRenderer {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
        }
    }

    /// Read `template` and substitute `{{message}}`. Templates without the
    /// slot pass through untouched.
    pub async fn render(&self, template: &str, flash: Option<&Flash>) -> anyhow::Result<String> {
        let path = self.static_dir.join(template);
        let html = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("read template {}", path.display()))?;
        let slot = flash.map(Flash::to_html).unwrap_or_default();
        Ok(html.replace("{{message}}", &slot))
    }
}

/// Standalone notice with a delayed client-side redirect, shown when a
/// protected page is hit without a session.
pub fn redirect_notice(message: &str, target: &str) -> String {
    format!(
        r#"<p class="text-red-600 text-center mt-20 text-xl">{message}</p>
<script>
    setTimeout(() => {{ window.location.href = '{target}'; }}, 2000);
</script>
"#
    )
}
