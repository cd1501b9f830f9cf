#![forbid(unsafe_code)]

//! Built-in tour presets for the chat application.
//!
//! Each preset is a named [`Sequence`]. The complete tour is the chat tour
//! followed by the workspace tour and a closing call-to-action step.
//!
//! Presets are rebuilt on every call; steps share their hooks behind `Arc`, so
//! this is cheap.

use std::fmt;
use std::str::FromStr;

use guidepost_core::hooks::{HookContext, HookError, StepHooks};
use guidepost_core::step::{Placement, Sequence, Step};

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

pub const WORKSPACE_PANEL: &str = ".workspace-panel";
pub const WORKSPACE_TOGGLE: &str = ".workspace-toggle-btn";
pub const LEFT_SIDEBAR: &str = ".left-sidebar";
pub const SIDEBAR_TOGGLE: &str = ".sidebar-toggle-btn";
pub const CHAT_INPUT: &str = "#main-input_field";
pub const CLOSED_CLASS: &str = "closed";

// ---------------------------------------------------------------------------
// Preset registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetId {
    Complete,
    Chat,
    Workspace,
    Welcome,
}

impl PresetId {
    pub const ALL: [PresetId; 4] = [
        PresetId::Complete,
        PresetId::Chat,
        PresetId::Workspace,
        PresetId::Welcome,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PresetId::Complete => "complete",
            PresetId::Chat => "chat",
            PresetId::Workspace => "workspace",
            PresetId::Welcome => "welcome",
        }
    }

    pub fn meta(self) -> &'static PresetMeta {
        match self {
            PresetId::Complete => &PRESET_REGISTRY[0],
            PresetId::Chat => &PRESET_REGISTRY[1],
            PresetId::Workspace => &PRESET_REGISTRY[2],
            PresetId::Welcome => &PRESET_REGISTRY[3],
        }
    }

    /// Build the step sequence for this preset.
    pub fn sequence(self) -> Sequence {
        match self {
            PresetId::Complete => complete_tour(),
            PresetId::Chat => chat_tour(),
            PresetId::Workspace => workspace_tour(),
            PresetId::Welcome => welcome_tour(),
        }
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPreset(pub String);

impl fmt::Display for UnknownPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tour preset: {:?}", self.0)
    }
}

impl std::error::Error for UnknownPreset {}

impl FromStr for PresetId {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        PresetId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownPreset(s.to_owned()))
    }
}

/// Menu-facing description of a preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetMeta {
    pub id: PresetId,
    pub title: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    /// Rendered with emphasis at the top of the menu.
    pub featured: bool,
    /// Offered in the help menu. The welcome tour is started programmatically.
    pub in_menu: bool,
}

/// Single source of truth for preset ordering and menu metadata.
pub const PRESET_REGISTRY: &[PresetMeta] = &[
    PresetMeta {
        id: PresetId::Complete,
        title: "Complete Tour",
        icon: "🚀",
        description: "Full walkthrough of all features",
        featured: true,
        in_menu: true,
    },
    PresetMeta {
        id: PresetId::Chat,
        title: "Chat Features",
        icon: "💬",
        description: "Messages, responses & file tagging",
        featured: false,
        in_menu: true,
    },
    PresetMeta {
        id: PresetId::Workspace,
        title: "Workspace Panel",
        icon: "📁",
        description: "File management & uploads",
        featured: false,
        in_menu: true,
    },
    PresetMeta {
        id: PresetId::Welcome,
        title: "Welcome",
        icon: "👋",
        description: "First look at the home screen",
        featured: false,
        in_menu: false,
    },
];

/// Presets offered in the help menu, in display order.
pub fn menu_presets() -> impl Iterator<Item = &'static PresetMeta> {
    PRESET_REGISTRY.iter().filter(|meta| meta.in_menu)
}

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

/// Clicks `toggle` when `panel` carries `closed_class`.
#[derive(Debug, Clone)]
pub struct OpenPanelHook {
    pub panel: &'static str,
    pub toggle: &'static str,
    pub closed_class: &'static str,
}

impl OpenPanelHook {
    pub const fn workspace() -> Self {
        Self {
            panel: WORKSPACE_PANEL,
            toggle: WORKSPACE_TOGGLE,
            closed_class: CLOSED_CLASS,
        }
    }
}

impl StepHooks for OpenPanelHook {
    fn name(&self) -> &str {
        "open-panel"
    }

    fn on_before_step(&self, cx: &mut HookContext<'_>) -> Result<(), HookError> {
        let doc = cx.document();
        if !doc.has_class(self.panel, self.closed_class) {
            return Ok(());
        }
        if !doc.click(self.toggle) {
            return Err(HookError::MissingElement(self.toggle.to_owned()));
        }
        tracing::debug!(panel = self.panel, toggle = self.toggle, "opened panel for tour step");
        Ok(())
    }
}

/// Moves keyboard focus to `selector`.
#[derive(Debug, Clone)]
pub struct FocusHook {
    pub selector: &'static str,
}

impl FocusHook {
    pub const fn chat_input() -> Self {
        Self {
            selector: CHAT_INPUT,
        }
    }
}

impl StepHooks for FocusHook {
    fn name(&self) -> &str {
        "focus"
    }

    fn on_before_step(&self, cx: &mut HookContext<'_>) -> Result<(), HookError> {
        if cx.document().focus(self.selector) {
            Ok(())
        } else {
            Err(HookError::MissingElement(self.selector.to_owned()))
        }
    }
}

/// Clicks `toggle` when `target` is not in the document.
#[derive(Debug, Clone)]
pub struct RevealHook {
    pub target: &'static str,
    pub toggle: &'static str,
}

impl RevealHook {
    pub const fn sidebar() -> Self {
        Self {
            target: LEFT_SIDEBAR,
            toggle: SIDEBAR_TOGGLE,
        }
    }
}

impl StepHooks for RevealHook {
    fn name(&self) -> &str {
        "reveal"
    }

    fn on_before_step(&self, cx: &mut HookContext<'_>) -> Result<(), HookError> {
        let doc = cx.document();
        if doc.exists(self.target) {
            return Ok(());
        }
        if !doc.click(self.toggle) {
            return Err(HookError::MissingElement(self.toggle.to_owned()));
        }
        tracing::debug!(target_selector = self.target, toggle = self.toggle, "revealed element for tour step");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

pub fn welcome_tour() -> Sequence {
    Sequence::new(
        PresetId::Welcome.as_str(),
        vec![
            Step::new(
                ".welcome-title",
                "Welcome to CUGA!",
                "CUGA is an intelligent digital agent that autonomously executes complex tasks through multi-agent orchestration, API integration, and code generation.",
            )
            .id("welcome:title")
            .placement(Placement::Bottom)
            .padding(12.0),
            Step::new(
                CHAT_INPUT,
                "Chat Input",
                "Type your requests here. You can ask CUGA to manage contacts, read files, send emails, or perform any complex task.",
            )
            .id("welcome:input")
            .placement(Placement::Top)
            .padding(10.0),
            Step::new(
                CHAT_INPUT,
                "File Tagging with @",
                "Type @ followed by a file name to tag files in your message. This allows CUGA to access and work with specific files from your workspace.",
            )
            .id("welcome:file-tagging")
            .placement(Placement::Top)
            .padding(10.0),
            Step::new(
                ".example-utterances-widget",
                "Try Example Queries",
                "Click any of these example queries to get started quickly. These demonstrate the types of tasks CUGA can handle.",
            )
            .id("welcome:examples")
            .placement(Placement::Top)
            .padding(12.0),
            Step::new(
                ".welcome-features",
                "Key Features",
                "CUGA offers multi-agent coordination, secure code execution, API integration, and smart memory to handle complex workflows.",
            )
            .id("welcome:features")
            .placement(Placement::Top)
            .padding(12.0),
        ],
    )
}

pub fn workspace_tour() -> Sequence {
    Sequence::new(
        PresetId::Workspace.as_str(),
        vec![
            Step::new(
                ".workspace-toggle-btn, .workspace-panel",
                "Workspace Panel",
                "This is the workspace panel. It shows all files in your workspace that CUGA can access and work with.",
            )
            .id("workspace:panel")
            .placement(Placement::Left)
            .padding(10.0)
            .hooks(OpenPanelHook::workspace()),
            Step::new(
                ".workspace-panel-header",
                "Workspace Tools",
                "Use the refresh button to reload files, or close the panel when you're done browsing.",
            )
            .id("workspace:tools")
            .placement(Placement::Left)
            .padding(8.0),
            Step::new(
                ".workspace-panel-content",
                "File Browser",
                "Click on any file to preview it. You can also download or delete files using the action buttons.",
            )
            .id("workspace:browser")
            .placement(Placement::Left)
            .padding(10.0),
            Step::new(
                WORKSPACE_PANEL,
                "Drag & Drop Upload",
                "Drag and drop files directly into the workspace panel to upload them for CUGA to use.",
            )
            .id("workspace:upload")
            .placement(Placement::Left)
            .padding(12.0),
        ],
    )
}

pub fn chat_tour() -> Sequence {
    Sequence::new(
        PresetId::Chat.as_str(),
        vec![
            Step::new(
                ".custom-chat-header",
                "Chat Header",
                "See your active conversation with CUGA here. Use the restart button to begin a new conversation.",
            )
            .id("chat:header")
            .placement(Placement::Bottom)
            .padding(10.0),
            Step::new(
                ".custom-chat-messages",
                "Agent Responses",
                "CUGA's responses appear here, showing its reasoning, tool usage, and results in an interactive card format.",
            )
            .id("chat:responses")
            .placement(Placement::Top)
            .padding(10.0),
            Step::new(
                ".chat-input-container",
                "File Tagging with @",
                "Type @ in the chat input to see file autocomplete. This lets you reference specific files from your workspace in your messages.",
            )
            .id("chat:file-tagging")
            .placement(Placement::Top)
            .padding(10.0)
            .hooks(FocusHook::chat_input()),
            Step::new(
                ".left-sidebar, .sidebar-toggle-btn",
                "Conversations & Variables",
                "Track your conversation history and view variables that CUGA has created or extracted during your interactions.",
            )
            .id("chat:sidebar")
            .placement(Placement::Right)
            .padding(10.0)
            .hooks(RevealHook::sidebar()),
        ],
    )
}

pub fn complete_tour() -> Sequence {
    let ready = Step::new(
        ".chat-send-btn",
        "Ready to Start!",
        "You're all set! Try sending a message to CUGA and see the magic happen. Remember to use @ to tag files and explore all the features.",
    )
    .id("complete:ready")
    .placement(Placement::Top)
    .padding(10.0);
    Sequence::concat(
        PresetId::Complete.as_str(),
        [&chat_tour(), &workspace_tour()],
        [ready],
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use guidepost_core::document::{ClickEffect, Document, MemoryDocument};
    use guidepost_core::geometry::{Rect, Size};

    use super::*;

    fn ctx_run(hook: &dyn StepHooks, doc: &mut MemoryDocument) -> Result<(), HookError> {
        let mut cx = HookContext::new(doc, "test", "step", 0, 1);
        hook.on_before_step(&mut cx)
    }

    #[test]
    fn registry_order_matches_ids() {
        for id in PresetId::ALL {
            assert_eq!(id.meta().id, id);
        }
    }

    #[test]
    fn menu_offers_complete_chat_workspace() {
        let ids: Vec<_> = menu_presets().map(|m| m.id).collect();
        assert_eq!(ids, vec![PresetId::Complete, PresetId::Chat, PresetId::Workspace]);
        assert!(PresetId::Complete.meta().featured);
    }

    #[test]
    fn preset_ids_parse() {
        assert_eq!("chat".parse::<PresetId>(), Ok(PresetId::Chat));
        assert_eq!(" Complete ".parse::<PresetId>(), Ok(PresetId::Complete));
        assert!("tutorial".parse::<PresetId>().is_err());
    }

    #[test]
    fn preset_lengths() {
        assert_eq!(chat_tour().len(), 4);
        assert_eq!(workspace_tour().len(), 4);
        assert_eq!(welcome_tour().len(), 5);
        assert_eq!(complete_tour().len(), 9);
    }

    #[test]
    fn complete_is_chat_then_workspace_then_ready() {
        let complete = complete_tour();
        let expected: Vec<String> = chat_tour()
            .steps()
            .iter()
            .chain(workspace_tour().steps())
            .map(|s| s.id.clone())
            .chain(["complete:ready".to_owned()])
            .collect();
        let actual: Vec<String> = complete.steps().iter().map(|s| s.id.clone()).collect();
        assert_eq!(actual, expected);
        assert_eq!(complete.name(), "complete");
    }

    #[test]
    fn step_ids_unique_within_each_preset() {
        for id in PresetId::ALL {
            let seq = id.sequence();
            let ids: HashSet<_> = seq.steps().iter().map(|s| s.id.as_str()).collect();
            assert_eq!(ids.len(), seq.len(), "duplicate step id in {id}");
        }
    }

    #[test]
    fn every_step_sets_explicit_padding() {
        for id in PresetId::ALL {
            for step in id.sequence().steps() {
                assert!(step.highlight_padding.is_some(), "{} has no padding", step.id);
            }
        }
    }

    #[test]
    fn multi_candidate_targets() {
        let ws = workspace_tour();
        let first: Vec<_> = ws.steps()[0].target.candidates().collect();
        assert_eq!(first, vec![".workspace-toggle-btn", ".workspace-panel"]);
    }

    #[test]
    fn open_panel_clicks_only_when_closed() {
        let mut doc = MemoryDocument::new(Size::new(800.0, 600.0));
        doc.insert_with_classes(WORKSPACE_PANEL, Rect::new(600.0, 0.0, 200.0, 600.0), ["closed"]);
        doc.insert(WORKSPACE_TOGGLE, Rect::new(760.0, 10.0, 30.0, 30.0));
        doc.on_click(
            WORKSPACE_TOGGLE,
            ClickEffect::RemoveClass {
                selector: WORKSPACE_PANEL.into(),
                class: "closed".into(),
            },
        );

        let hook = OpenPanelHook::workspace();
        ctx_run(&hook, &mut doc).unwrap();
        assert_eq!(doc.clicks(WORKSPACE_TOGGLE), 1);
        assert!(!doc.has_class(WORKSPACE_PANEL, "closed"));

        ctx_run(&hook, &mut doc).unwrap();
        assert_eq!(doc.clicks(WORKSPACE_TOGGLE), 1);
    }

    #[test]
    fn open_panel_without_toggle_reports_missing() {
        let mut doc = MemoryDocument::new(Size::new(800.0, 600.0));
        doc.insert_with_classes(WORKSPACE_PANEL, Rect::new(600.0, 0.0, 200.0, 600.0), ["closed"]);
        assert_eq!(
            ctx_run(&OpenPanelHook::workspace(), &mut doc),
            Err(HookError::MissingElement(WORKSPACE_TOGGLE.into()))
        );
    }

    #[test]
    fn focus_hook_focuses_chat_input() {
        let mut doc = MemoryDocument::new(Size::new(800.0, 600.0));
        doc.insert(CHAT_INPUT, Rect::new(0.0, 500.0, 600.0, 40.0));
        ctx_run(&FocusHook::chat_input(), &mut doc).unwrap();
        assert_eq!(doc.focused(), Some(CHAT_INPUT));
    }

    #[test]
    fn reveal_hook_opens_missing_sidebar() {
        let mut doc = MemoryDocument::new(Size::new(800.0, 600.0));
        doc.insert(SIDEBAR_TOGGLE, Rect::new(0.0, 0.0, 30.0, 30.0));
        doc.on_click(
            SIDEBAR_TOGGLE,
            ClickEffect::Insert {
                selector: LEFT_SIDEBAR.into(),
                rect: Rect::new(0.0, 0.0, 240.0, 600.0),
            },
        );
        let hook = RevealHook::sidebar();
        ctx_run(&hook, &mut doc).unwrap();
        assert!(doc.exists(LEFT_SIDEBAR));

        ctx_run(&hook, &mut doc).unwrap();
        assert_eq!(doc.clicks(SIDEBAR_TOGGLE), 1);
    }
}
