use crate::schema::{PlayerDef, SheetConfig, SquadFile};
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

const SHEET_FILE: &str = "sheet.json";
const SQUAD_FILE: &str = "squad.json";

pub type RolePools = BTreeMap<String, Vec<PlayerDef>>;

pub fn load_squad(path: &Path) -> anyhow::Result<SquadFile> {
    load_json(path)
}

pub fn load_sheet_config(dir: &Path) -> anyhow::Result<SheetConfig> {
    let config: SheetConfig = load_json(&dir.join(SHEET_FILE))?;
    validate_config(&config)?;
    Ok(config)
}

/// Loads `sheet.json` and `squad.json` from `dir` and splits the squad into
/// one pool per role.
pub fn load_team(dir: &Path) -> anyhow::Result<(SheetConfig, SquadFile, RolePools)> {
    let config = load_sheet_config(dir)?;
    let squad = load_squad(&dir.join(SQUAD_FILE))?;
    let pools = role_pools(&squad, &config)
        .with_context(|| format!("squad {}", squad.name))?;
    Ok((config, squad, pools))
}

/// Groups players by role in squad-file order. Every configured role gets a
/// pool, possibly empty.
pub fn role_pools(squad: &SquadFile, config: &SheetConfig) -> anyhow::Result<RolePools> {
    let mut pools: RolePools = config
        .roles
        .iter()
        .map(|rule| (rule.id.clone(), Vec::new()))
        .collect();
    let mut names = HashSet::new();
    let mut numbers = HashSet::new();
    for player in &squad.players {
        if !names.insert(player.name.as_str()) {
            bail!("duplicate player name {}", player.name);
        }
        if !numbers.insert(player.number) {
            bail!("duplicate shirt number {} ({})", player.number, player.name);
        }
        let Some(pool) = pools.get_mut(&player.role) else {
            bail!("player {} has unknown role {}", player.name, player.role);
        };
        pool.push(player.clone());
    }
    Ok(pools)
}

fn validate_config(config: &SheetConfig) -> anyhow::Result<()> {
    let mut roles = HashSet::new();
    for rule in &config.roles {
        if !roles.insert(rule.id.to_ascii_lowercase()) {
            bail!("role {} is defined twice", rule.id);
        }
        if rule.starter_slots + rule.substitute_slots == 0 {
            bail!("role {} has no slots", rule.id);
        }
    }
    for scheme in &config.schemes {
        for (role, count) in &scheme.starters {
            let Some(rule) = config.role_rule(role) else {
                bail!("scheme {} names unknown role {}", scheme.name, role);
            };
            if *count > rule.starter_slots {
                bail!(
                    "scheme {} asks for {} {} starters, only {} slots",
                    scheme.name,
                    count,
                    role,
                    rule.starter_slots
                );
            }
        }
    }
    if let Some(name) = &config.default_scheme {
        if config.scheme_rule(name).is_none() {
            bail!("default scheme {name} is not defined");
        }
    }
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RoleRule;

    fn config() -> SheetConfig {
        serde_json::from_str(
            r#"{
                "roles": [
                    { "id": "GK", "label": "Goalkeeper", "starter_slots": 1, "substitute_slots": 1 },
                    { "id": "DEF", "label": "Defender", "starter_slots": 5 }
                ],
                "schemes": [ { "name": "4-4-2", "starters": { "DEF": 4 } } ],
                "default_scheme": "4-4-2"
            }"#,
        )
        .expect("config")
    }

    fn player(name: &str, number: u8, role: &str) -> PlayerDef {
        PlayerDef {
            name: name.to_string(),
            number,
            role: role.to_string(),
        }
    }

    fn squad(players: Vec<PlayerDef>) -> SquadFile {
        SquadFile {
            name: "Test XI".to_string(),
            players,
        }
    }

    #[test]
    fn substitute_slots_default_to_zero() {
        let config = config();
        assert_eq!(config.roles[1].substitute_slots, 0);
        validate_config(&config).expect("valid");
    }

    #[test]
    fn pools_keep_squad_order_per_role() {
        let squad = squad(vec![
            player("Adams", 2, "DEF"),
            player("Banks", 1, "GK"),
            player("Cole", 3, "DEF"),
        ]);
        let pools = role_pools(&squad, &config()).expect("pools");
        let defenders: Vec<&str> = pools["DEF"].iter().map(|p| p.name.as_str()).collect();
        assert_eq!(defenders, vec!["Adams", "Cole"]);
        assert_eq!(pools["GK"].len(), 1);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let squad = squad(vec![player("Adams", 2, "WING")]);
        let err = role_pools(&squad, &config()).expect_err("unknown role");
        assert!(err.to_string().contains("unknown role WING"));
    }

    #[test]
    fn duplicate_names_and_numbers_are_rejected() {
        let names = squad(vec![player("Adams", 2, "DEF"), player("Adams", 3, "DEF")]);
        let err = role_pools(&names, &config()).expect_err("duplicate name");
        assert!(err.to_string().contains("duplicate player name"));

        let numbers = squad(vec![player("Adams", 2, "DEF"), player("Cole", 2, "DEF")]);
        let err = role_pools(&numbers, &config()).expect_err("duplicate number");
        assert!(err.to_string().contains("duplicate shirt number 2"));
    }

    #[test]
    fn schemes_must_fit_their_roles() {
        let mut config = config();
        config.schemes[0].starters.insert("DEF".to_string(), 6);
        assert!(validate_config(&config).is_err());

        let mut config = self::config();
        config.roles.push(RoleRule {
            id: "GK".to_string(),
            label: "Keeper".to_string(),
            starter_slots: 1,
            substitute_slots: 0,
        });
        assert!(validate_config(&config).is_err());

        let mut config = self::config();
        config.default_scheme = Some("3-5-2".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn role_ids_clash_regardless_of_case() {
        let mut config = config();
        config.roles[1].id = "gk".to_string();
        let err = validate_config(&config).expect_err("case clash");
        assert!(err.to_string().contains("role gk is defined twice"));
    }

    #[test]
    fn roles_without_slots_are_rejected() {
        let mut config = config();
        config.roles[0].starter_slots = 0;
        config.roles[0].substitute_slots = 0;
        let err = validate_config(&config).expect_err("empty role");
        assert!(err.to_string().contains("role GK has no slots"));
    }
}
