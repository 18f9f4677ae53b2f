//! Built-in harness layouts

use super::HarnessSpec;

/// Layouts of the harnesses supported out of the box
pub fn builtin_harnesses() -> Vec<HarnessSpec> {
    vec![
        HarnessSpec::new("claude", "Claude Code")
            .with_skill_dir(".claude/skills")
            .with_agent_dir(".claude/agents")
            .with_tool_config_file(".mcp.json"),
        HarnessSpec::new("codex", "Codex CLI")
            .with_skill_dir(".codex/skills")
            .with_agent_document("AGENTS.md")
            .with_tool_config_file(".codex/config.toml"),
        HarnessSpec::new("cursor", "Cursor")
            .with_skill_dir(".cursor/skills")
            .with_agent_dir(".cursor/agents")
            .with_tool_config_file(".cursor/mcp.json"),
        HarnessSpec::new("gemini", "Gemini CLI")
            .with_skill_dir(".gemini/skills")
            .with_agent_document("GEMINI.md")
            .with_tool_config_file(".gemini/settings.json"),
        HarnessSpec::new("opencode", "OpenCode")
            .with_skill_dir(".opencode/skill")
            .with_agent_dir(".opencode/agent")
            .with_tool_config_file("opencode.json"),
    ]
}
