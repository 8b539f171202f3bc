use std::path::Path;

use axum::response::Html;
use minijinja::{path_loader, Environment};
use serde::Serialize;

pub const INDEX: &str = "index";
pub const CAT_DETAIL: &str = "cat-detail";

/// Named HTML templates resolved as `<dir>/<name>.html`.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn from_dir(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let mut env = Environment::new();
        env.set_loader(path_loader(dir.as_ref()));
        let templates = Self { env };
        for name in [INDEX, CAT_DETAIL] {
            templates
                .env
                .get_template(&file_name(name))
                .map_err(|e| anyhow::anyhow!("load template {}: {}", name, e))?;
        }
        Ok(templates)
    }

    pub fn render<S: Serialize>(&self, name: &str, bindings: S) -> Result<Html<String>, minijinja::Error> {
        let tmpl = self.env.get_template(&file_name(name))?;
        tmpl.render(bindings).map(Html)
    }
}

fn file_name(name: &str) -> String {
    format!("{}.html", name)
}
