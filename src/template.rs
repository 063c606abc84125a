// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use tera::{Context, Tera};

/// Templates compiled into the binary. A file with the same name in the
/// templates directory replaces the built-in one.
const BUILTIN: [(&str, &str); 10] = [
    ("root.html", include_str!("../templates/root.html")),
    ("card.html", include_str!("../templates/card.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("articles.html", include_str!("../templates/articles.html")),
    ("article.html", include_str!("../templates/article.html")),
    ("categories.html", include_str!("../templates/categories.html")),
    ("category.html", include_str!("../templates/category.html")),
    ("contact.html", include_str!("../templates/contact.html")),
    ("donate.html", include_str!("../templates/donate.html")),
    ("not_found.html", include_str!("../templates/not_found.html")),
];

#[derive(Clone, Debug)]
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new(dir: Option<&Path>) -> Result<Self, tera::Error> {
        let overrides = match dir {
            Some(dir) => Self::find_overrides(dir),
            None => vec![],
        };

        Ok(Self {
            tera: Self::create_tera(overrides)?,
        })
    }

    /// Creates a Tera instance with the built-in templates, then the override
    /// files on top. `.html` templates are autoescaped; article bodies are
    /// marked `safe` in the templates themselves.
    fn create_tera(files: Vec<(PathBuf, String)>) -> Result<Tera, tera::Error> {
        let mut tera: Tera = Tera::default();

        tera.add_raw_templates(BUILTIN.to_vec())?;
        tera.add_template_files(
            files
                .iter()
                .map(|(path, name)| (path.as_path(), Some(name.as_str())))
                .collect::<Vec<(&Path, Option<&str>)>>(),
        )?;

        Ok(tera)
    }

    /// Every regular file under `dir`, named by its path relative to `dir`.
    fn find_overrides(dir: &Path) -> Vec<(PathBuf, String)> {
        let mut found: Vec<(PathBuf, String)> = vec![];

        for entry in walkdir::WalkDir::new(dir).into_iter().filter_map(|entry| entry.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(name) = entry
                .path()
                .strip_prefix(dir)
                .ok()
                .and_then(|rel| rel.to_str())
            {
                log::debug!("Template override {:?}", entry.path());
                found.push((entry.path().to_owned(), name.replace('\\', "/")));
            }
        }

        found
    }

    /// Render a page.
    pub fn render(&self, template: &str, context: &Context) -> Result<String, tera::Error> {
        self.tera.render(template, context)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tera.get_template_names().collect()
    }
}

#[cfg(test)]
mod test {
    use std::{collections::HashMap, io::Write};

    use tera::Context;

    use crate::template::Templates;

    #[test]
    fn builtin_templates_parse() {
        let templates = Templates::new(None).unwrap();

        for name in ["root.html", "index.html", "article.html", "not_found.html"] {
            assert!(templates.names().contains(&name), "{}", name);
        }
    }

    #[test]
    fn override_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::File::create(dir.path().join("root.html"))
            .unwrap()
            .write_all(
                b"<html>\n  <head><title>{{ page.title }}</title></head>\n  <body>{% block main %}{% endblock main %}</body>\n</html>\n",
            )
            .unwrap();
        std::fs::File::create(dir.path().join("not_found.html"))
            .unwrap()
            .write_all(b"{% extends \"root.html\" %}{% block main %}<h1>{{ heading }}</h1>{% endblock main %}")
            .unwrap();

        let templates = Templates::new(Some(dir.path())).unwrap();
        let mut context = Context::new();
        context.insert("page", &HashMap::from([("title", "yes")]));
        context.insert("heading", "This is a test!");

        assert_eq!(
            templates.render("not_found.html", &context).unwrap(),
            "<html>\n  <head><title>yes</title></head>\n  <body><h1>This is a test!</h1></body>\n</html>\n"
        )
    }
}
