use takeoffcmd::command::normalize::{normalize_unit, parse_number};
use takeoffcmd::command::rules::OPEN_PROJECT_FIRST;
use takeoffcmd::{get_capabilities, parse_command, CommandContext, ParamValue, ParseResult};

fn project() -> CommandContext {
    CommandContext::with_project("p1")
}

fn param<'a>(result: &'a ParseResult, index: usize, key: &str) -> &'a ParamValue {
    result.actions[index]
        .param(key)
        .unwrap_or_else(|| panic!("action {index} has no param {key}"))
}

#[test]
fn test_parse_is_deterministic() {
    let inputs = [
        ("Create project Smithfield Addition. Tax 7 markup 20", CommandContext::default()),
        ("Add drywall 1050 sf at $12.99", project()),
        ("xyz nonsense", CommandContext::default()),
        ("export takeoff csv", project()),
    ];
    for (command, ctx) in &inputs {
        assert_eq!(parse_command(command, ctx), parse_command(command, ctx));
    }
}

#[test]
fn test_empty_input() {
    for command in ["", "   "] {
        let result = parse_command(command, &CommandContext::default());
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Empty command"));
        assert!(result.actions.is_empty());
    }
}

#[test]
fn test_unit_normalization() {
    for alias in ["Sq Ft", "SQFT", "square feet", "sf"] {
        assert_eq!(normalize_unit(alias), "SF");
    }
    for input in ["Sq Ft", "lf", "each", "widgets", "cu. yd"] {
        let once = normalize_unit(input);
        assert_eq!(normalize_unit(&once), once);
    }
}

#[test]
fn test_number_words() {
    assert_eq!(parse_number("thirty five"), Some(35.0));
    assert_eq!(parse_number("seven"), Some(7.0));
    assert_eq!(parse_number("twenty"), Some(20.0));
    assert_eq!(parse_number("banana"), None);
}

#[test]
fn test_combined_extraction() {
    let result = parse_command(
        "Create project Smithfield Addition. Tax 7 markup 20",
        &CommandContext::default(),
    );
    assert!(result.success);
    assert_eq!(result.action_types(), ["project.create", "project.set_defaults"]);
    assert_eq!(param(&result, 0, "name").as_str(), Some("Smithfield Addition"));
    assert_eq!(param(&result, 1, "tax_percent"), &ParamValue::Int(7));
    assert_eq!(param(&result, 1, "markup_percent"), &ParamValue::Int(20));
}

#[test]
fn test_unnamed_create_does_not_unlock_defaults() {
    for command in ["Create project. Tax 7", "Create project Waste 5", "new project, markup 20"] {
        let result = parse_command(command, &CommandContext::default());
        assert!(!result.success, "{command}");
        assert!(result.actions.is_empty(), "{command}");
        assert_eq!(
            result.missing_info.as_deref(),
            Some("What should the new project be called?"),
            "{command}"
        );
    }
}

#[test]
fn test_create_project_with_apostrophe() {
    let result = parse_command("Create project O'Brien Kitchen", &CommandContext::default());
    assert_eq!(result.action_types(), ["project.create"]);
    assert_eq!(param(&result, 0, "name").as_str(), Some("O'Brien Kitchen"));
}

#[test]
fn test_generate_drafts_from_assemblies() {
    let result = parse_command(
        "Generate drafts using framing + drywall. 90 LF walls, 8 ft ceilings",
        &project(),
    );
    assert!(result.success);
    assert_eq!(result.action_types(), ["takeoff.generate_drafts_from_assemblies"]);

    let assemblies: Vec<&str> = param(&result, 0, "assemblies")
        .as_list()
        .unwrap()
        .iter()
        .filter_map(ParamValue::as_str)
        .collect();
    assert_eq!(assemblies, ["framing", "drywall"]);

    let variables = param(&result, 0, "variables").as_map().unwrap();
    assert_eq!(variables["wall_lf"].as_float(), Some(90.0));
    assert_eq!(variables["ceiling_height"].as_float(), Some(8.0));
}

#[test]
fn test_add_item() {
    let result = parse_command("Add drywall 1050 sf at $12.99", &project());
    assert!(result.success);
    assert_eq!(result.action_types(), ["takeoff.add_item"]);
    assert_eq!(param(&result, 0, "description").as_str(), Some("Drywall"));
    assert_eq!(param(&result, 0, "quantity"), &ParamValue::Int(1050));
    assert_eq!(param(&result, 0, "unit").as_str(), Some("SF"));
    assert_eq!(param(&result, 0, "unit_cost"), &ParamValue::Float(12.99));
    assert_eq!(param(&result, 0, "category").as_str(), Some("Drywall"));
    assert_eq!(param(&result, 0, "draft").as_bool(), Some(false));
}

#[test]
fn test_context_gating() {
    let commands = [
        "Add drywall 1050 sf at $12.99",
        "Generate drafts using framing + drywall",
        "Export proposal PDF",
        "export takeoff csv",
        "show qa issues",
        "promote all drafts",
        "Set markup 20 tax 7",
        "Add task hang drywall 24 hours",
        "open plans",
        "generate takeoff pdf",
    ];
    for command in commands {
        let result = parse_command(command, &CommandContext::default());
        assert!(!result.success, "{command}");
        assert!(result.actions.is_empty(), "{command}");
        assert_eq!(result.missing_info.as_deref(), Some(OPEN_PROJECT_FIRST), "{command}");
    }
}

#[test]
fn test_fallback_suggestions() {
    let result = parse_command("xyz nonsense", &CommandContext::default());
    assert!(!result.success);
    assert!(result.error.as_deref().is_some_and(|e| !e.is_empty()));
    let count = result.suggestions.as_ref().map_or(0, Vec::len);
    assert!((1..=5).contains(&count));
}

#[test]
fn test_capabilities_stable() {
    let before = get_capabilities();
    assert!(!before.rules.is_empty());
    assert!(before.rules.iter().all(|rule| !rule.examples.is_empty()));

    parse_command("Add drywall 1050 sf at $12.99", &project());
    parse_command("xyz nonsense", &CommandContext::default());

    assert_eq!(get_capabilities(), before);
}

#[test]
fn test_capabilities_outrank_other_rules() {
    // "issues" alone would select the QA rule
    let result = parse_command("list commands for qa issues", &project());
    assert_eq!(result.action_types(), ["system.capabilities"]);
}

#[test]
fn test_missing_info_ends_parse() {
    // The defaults clause could match on its own, but the clarifying
    // question from the higher-priority rule is returned alone.
    let result = parse_command("Generate drafts. Tax 7", &project());
    assert!(!result.success);
    assert!(result.actions.is_empty());
    assert!(result
        .missing_info
        .as_deref()
        .is_some_and(|q| q.contains("assemblies")));
}

#[test]
fn test_versions_on_every_result() {
    for (command, ctx) in [
        ("", CommandContext::default()),
        ("help", CommandContext::default()),
        ("export csv", CommandContext::default()),
        ("xyz", CommandContext::default()),
    ] {
        let result = parse_command(command, &ctx);
        assert_eq!(result.schema_version, takeoffcmd::SCHEMA_VERSION);
        assert_eq!(result.parser_version, takeoffcmd::PARSER_VERSION);
    }
}
