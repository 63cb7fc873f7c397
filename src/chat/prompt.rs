use std::path::Path;

use serde::Deserialize;

use super::types::ChatError;

/// Source of the system prompt placed at the head of every upstream
/// conversation.
pub trait SystemPromptProvider: Send + Sync {
    fn system_prompt(&self) -> &str;
}

/// A fixed prompt string.
#[derive(Debug, Clone)]
pub struct StaticPrompt(pub String);

impl SystemPromptProvider for StaticPrompt {
    fn system_prompt(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Persona
// ---------------------------------------------------------------------------

/// Facts about the site owner that ground the assistant's answers.
#[derive(Debug, Clone, Deserialize)]
pub struct Persona {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub location: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
}

impl Default for Persona {
    fn default() -> Self {
        Persona {
            name: "Alex Carter".to_string(),
            role: "Full-Stack Developer".to_string(),
            location: Some("Remote".to_string()),
            summary: "Builds fast, accessible web applications end to end, from \
                      database schema to polished UI."
                .to_string(),
            skills: [
                "React",
                "Next.js",
                "TypeScript",
                "Node.js",
                "Tailwind CSS",
                "MongoDB",
                "PostgreSQL",
                "Python",
                "Docker",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            projects: vec![
                Project {
                    name: "Portfolio".to_string(),
                    description: "This site: animated personal portfolio with an AI chat \
                                  assistant."
                        .to_string(),
                },
                Project {
                    name: "TaskFlow".to_string(),
                    description: "Kanban-style project manager with real-time collaboration."
                        .to_string(),
                },
                Project {
                    name: "ShopLite".to_string(),
                    description: "Headless e-commerce storefront with Stripe checkout."
                        .to_string(),
                },
            ],
            contact: Some("the contact form on this site".to_string()),
        }
    }
}

impl Persona {
    /// Load a persona from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ChatError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ChatError::Persona(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| ChatError::Persona(format!("{}: {e}", path.display())))
    }
}

// ---------------------------------------------------------------------------
// Persona prompt
// ---------------------------------------------------------------------------

/// System prompt rendered once from a [`Persona`].
#[derive(Debug, Clone)]
pub struct PersonaPrompt {
    rendered: String,
}

impl PersonaPrompt {
    pub fn new(persona: &Persona) -> Self {
        Self {
            rendered: render(persona),
        }
    }

    /// Use the persona file if one is given, the built-in persona otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ChatError> {
        let persona = match path {
            Some(p) => Persona::from_file(p)?,
            None => Persona::default(),
        };
        Ok(Self::new(&persona))
    }
}

impl Default for PersonaPrompt {
    fn default() -> Self {
        Self::new(&Persona::default())
    }
}

impl SystemPromptProvider for PersonaPrompt {
    fn system_prompt(&self) -> &str {
        &self.rendered
    }
}

fn render(p: &Persona) -> String {
    let mut out = format!(
        "You are the AI assistant on {name}'s portfolio website. You answer visitors' \
         questions about {name} in a friendly, professional tone.\n\n\
         About {name}:\n- Role: {role}\n",
        name = p.name,
        role = p.role,
    );
    if let Some(loc) = &p.location {
        out.push_str(&format!("- Location: {loc}\n"));
    }
    out.push_str(&format!("- Summary: {}\n", p.summary));

    if !p.skills.is_empty() {
        out.push_str(&format!("\nSkills: {}\n", p.skills.join(", ")));
    }

    if !p.projects.is_empty() {
        out.push_str("\nProjects:\n");
        for project in &p.projects {
            out.push_str(&format!("- {}: {}\n", project.name, project.description));
        }
    }

    out.push_str(
        "\nGuidelines:\n\
         - Keep answers concise (2-4 sentences) unless asked for detail\n\
         - Only state facts listed above; if you don't know, say so\n\
         - Politely steer unrelated questions back to the portfolio\n",
    );
    if let Some(contact) = &p.contact {
        out.push_str(&format!(
            "- For hiring or collaboration, point visitors to {contact}\n"
        ));
    }
    out
}
