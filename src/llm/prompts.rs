use minijinja::{Environment, context};

const SCHEMA_GENERATION: &str = r#"You are an expert database architect.

Generate a COMPLETE database schema for the following business model:

{{ model_name }}

OUTPUT MUST BE STRICT JSON WITH FIELDS:
{
  "entities": [...],
  "relationships": [...],
  "description": "...",
  "sql_script": "..."
}

RULES:
Entities must include:
 - name
 - attributes → name, data_type, PK, FK, unique, AI, not_null, default

Relationships must include:
 - from_entity
 - to_entity
 - type
 - FK details

SQL must:
 - be valid MySQL
 - no comments or markdown
 - include PK, FK, AUTO_INCREMENT
 - be ordered correctly

Output ONLY valid JSON.
"#;

const TRANSLATE_GENERATE: &str = r#"You are an expert at generating correct {{ query_type }} SQL queries for {{ dialect }}.
Below is the **actual schema** of the target database.

=== SCHEMA START ===
{{ schema_summary }}
=== SCHEMA END ===

Return STRICT JSON ONLY:
{
  "sql": "...",
  "explanation": "..."
}

User intent: {{ text }}
"#;

const TRANSLATE_OPTIMIZE: &str = r#"You are a SQL optimization engine.
Return a STRICT JSON object with ALL of the following fields ALWAYS present:
  "optimized_sql": string,
  "suggestions": array of strings,
  "indexes": array of strings,
  "complexity": string,
  "cost": string,
  "explanation": string

SQL Query:
{{ sql }}
"#;

/// Holds the instruction templates. Names carry no `.html` suffix so values
/// are interpolated verbatim, without auto-escaping.
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl PromptBuilder {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("schema_generation", SCHEMA_GENERATION)?;
        env.add_template("translate_generate", TRANSLATE_GENERATE)?;
        env.add_template("translate_optimize", TRANSLATE_OPTIMIZE)?;
        Ok(Self { env })
    }

    pub fn schema_generation(&self, model_name: &str) -> Result<String, minijinja::Error> {
        self.env
            .get_template("schema_generation")?
            .render(context! { model_name })
    }

    pub fn translate_generate(
        &self,
        query_type: &str,
        dialect: &str,
        schema_summary: &str,
        text: &str,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("translate_generate")?.render(context! {
            query_type,
            dialect,
            schema_summary,
            text,
        })
    }

    pub fn translate_optimize(&self, sql: &str) -> Result<String, minijinja::Error> {
        self.env
            .get_template("translate_optimize")?
            .render(context! { sql })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_prompt_embeds_model_name_verbatim() {
        let prompts = PromptBuilder::new().unwrap();
        let name = r#"Online bookstore <b>"quoted"</b> & {{ not_a_var }}"#;
        let prompt = prompts.schema_generation(name).unwrap();
        assert!(prompt.contains(name));
        assert!(prompt.starts_with("You are an expert database architect."));
        assert!(prompt.contains("\"sql_script\": \"...\""));
        assert!(prompt.contains(" - be valid MySQL"));
    }

    #[test]
    fn generate_prompt_carries_schema_and_intent() {
        let prompts = PromptBuilder::new().unwrap();
        let summary = "Table: users\n  - id (int)";
        let prompt = prompts
            .translate_generate("SELECT", "MySQL", summary, "count users")
            .unwrap();
        assert!(prompt.starts_with("You are an expert at generating correct SELECT SQL queries for MySQL."));
        assert!(prompt.contains(&format!("=== SCHEMA START ===\n{summary}\n=== SCHEMA END ===")));
        assert!(prompt.contains("User intent: count users"));
    }

    #[test]
    fn optimize_prompt_lists_required_fields() {
        let prompts = PromptBuilder::new().unwrap();
        let prompt = prompts.translate_optimize("SELECT * FROM t").unwrap();
        for field in ["optimized_sql", "suggestions", "indexes", "complexity", "cost", "explanation"] {
            assert!(prompt.contains(&format!("\"{field}\"")), "{field}");
        }
        assert!(prompt.ends_with("SQL Query:\nSELECT * FROM t"));
    }
}
