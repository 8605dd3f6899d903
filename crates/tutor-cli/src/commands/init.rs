//! The `tutor init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("tutor.toml").exists() {
        println!("tutor.toml already exists, skipping.");
    } else {
        std::fs::write("tutor.toml", SAMPLE_CONFIG)?;
        println!("Created tutor.toml");
    }

    std::fs::create_dir_all("rubrics")?;
    let rubric_path = std::path::Path::new("rubrics/standard.toml");
    if rubric_path.exists() {
        println!("rubrics/standard.toml already exists, skipping.");
    } else {
        std::fs::write(rubric_path, STANDARD_RUBRIC)?;
        println!("Created rubrics/standard.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export GROQ_API_KEY or edit tutor.toml");
    println!("  2. Write playbook.yml, then run: tutor check playbook.yml");
    println!("  3. Stuck? Run: tutor hint --task \"install and start nginx\"");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# playbook-tutor configuration

default_provider = "groq"
default_model = "llama3-70b-8192"
# temperature = 0.2
# max_tokens = 1024
# system_prompt = "You are an Ansible expert helping users write playbooks."

[providers.groq]
type = "groq"
api_key = "${GROQ_API_KEY}"

# [providers.openai]
# type = "openai"
# api_key = "${OPENAI_API_KEY}"
"#;

const STANDARD_RUBRIC: &str = r#"[rubric]
id = "standard"
name = "Install and start a service"
description = "Package installed with apt, service started, privilege escalation enabled"

[[checks]]
token = "apt:"
points = 20
message = "Missing apt module"

[[checks]]
token = "service:"
points = 20
message = "Missing service module"

[[checks]]
token = "state: present"
points = 20
message = "'state: present' might be missing"

[[checks]]
token = "state: started"
points = 20
message = "'state: started' might be missing"

[[checks]]
token = "become: yes"
points = 20
message = "'become: yes' is a good practice for installing packages"
"#;
