use std::path::PathBuf;

use anyhow::Result;

use crate::io;

const DEFAULT_CONFIG: &str = r#"# impactmap configuration

# Raw tracker statuses per lifecycle category. Names are matched
# case-insensitively with dashes treated as spaces.
[workflow]
unstarted = ["to do", "open", "backlog", "unscheduled"]
started = ["started", "in progress"]
blocked = ["blocked", "on hold"]
peer_review = ["peer review", "in review", "code review"]
finished = ["finished"]
delivered = ["delivered"]
accepted = ["accepted", "uat", "ready for release", "closed completed"]
rejected = ["rejected"]
canceled = ["closed canceled", "canceled", "won't do"]

# Each group must sum to 1.0.
[weights]
velocity = 0.60
flow = 0.25
quality = 0.15
velocity_throughput = 0.60
velocity_efficiency = 0.40
quality_bugs = 0.60
quality_rejections = 0.40

[curve]
median_baseline = 70.0
excellence = 100.0
bug_penalty = 20.0
bug_cap = 5
flow_default = 70.0

[sprint]
duration_days = 7
exclude_active = true

[tracker]
project_key = "PROJ"
team_field = "customfield_10400"
team_filter = "Foundation"
story_points_field = "customfield_10006"
sprint_field = "customfield_10001"
page_size = 100
"#;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(".impactmap.toml");

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    println!("Created .impactmap.toml configuration file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_and_validate_config;

    #[test]
    fn default_template_parses_to_default_config() {
        let config = parse_and_validate_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.weights.velocity, 0.60);
        assert_eq!(config.curve.bug_cap, 5);
        assert_eq!(config.sprint.duration_days, 7);
        assert_eq!(config.tracker.project_key, "PROJ");
    }
}
