//! Guided query builder
//!
//! A picker that turns canned choices into a free-text search. Two modes:
//!
//! - **Goal** ("I want to ..."): one step; the query is every term of the
//!   chosen option joined by spaces.
//! - **Have/Want** ("I have ... and want to ..."): two steps; the query is
//!   the action's primary term followed by the data's primary term, so the
//!   action leads the fuzzy ranking.
//!
//! Choosing a new first step drops any second step already chosen.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

use crate::catalog::read_or_bundled;
use crate::error::{Result, StacksiftError};
use crate::search::QueryAction;

pub(crate) const BUNDLED_GUIDED: &str = include_str!("../data/guided.yaml");

/// One selectable choice and the search terms it stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidedOption {
    pub value: String,
    pub label: String,
    pub searches: Vec<String>,
}

impl GuidedOption {
    fn primary_term(&self) -> Option<&str> {
        self.searches.first().map(String::as_str)
    }
}

/// A one-click canned search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickSearch {
    pub label: String,
    pub search: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuidedTemplates {
    /// "I have ..." options
    pub have: Vec<GuidedOption>,
    /// "... and want to ..." options
    pub want: Vec<GuidedOption>,
    /// "I want to ..." options
    pub goals: Vec<GuidedOption>,
    #[serde(default)]
    pub quick_searches: Vec<QuickSearch>,
}

impl GuidedTemplates {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml_ng::from_str(content).map_err(|e| StacksiftError::yaml("guided templates", e))
    }

    pub fn bundled() -> Result<Self> {
        Self::from_yaml(BUNDLED_GUIDED)
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_yaml(&read_or_bundled(path, BUNDLED_GUIDED)?)
    }

    fn lookup<'t>(
        options: &'t [GuidedOption],
        step: &'static str,
        value: &str,
    ) -> Result<&'t GuidedOption> {
        options
            .iter()
            .find(|o| o.value == value)
            .ok_or_else(|| StacksiftError::UnknownGuidedOption {
                step,
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidedMode {
    HaveWant,
    #[default]
    Goal,
}

/// Picker state over a set of templates
#[derive(Debug, Clone)]
pub struct GuidedSearch<'t> {
    templates: &'t GuidedTemplates,
    mode: GuidedMode,
    have: Option<&'t GuidedOption>,
    want: Option<&'t GuidedOption>,
    goal: Option<&'t GuidedOption>,
}

impl<'t> GuidedSearch<'t> {
    pub fn new(templates: &'t GuidedTemplates) -> Self {
        Self {
            templates,
            mode: GuidedMode::default(),
            have: None,
            want: None,
            goal: None,
        }
    }

    pub fn mode(&self) -> GuidedMode {
        self.mode
    }

    /// Switch mode, discarding every selection
    pub fn select_mode(&mut self, mode: GuidedMode) {
        self.mode = mode;
        self.have = None;
        self.want = None;
        self.goal = None;
    }

    /// Choose the first "I have" step; any "want to" step is invalidated
    pub fn choose_have(&mut self, value: &str) -> Result<()> {
        let templates = self.templates;
        let option = GuidedTemplates::lookup(&templates.have, "have", value)?;
        if self.mode != GuidedMode::HaveWant {
            self.select_mode(GuidedMode::HaveWant);
        }
        self.have = Some(option);
        self.want = None;
        debug!(value, "Guided first step chosen");
        Ok(())
    }

    /// Clear the first step, which also clears the second
    pub fn clear_have(&mut self) {
        self.have = None;
        self.want = None;
    }

    /// Choose the "and want to" step; returns the query once both steps are set
    pub fn choose_want(&mut self, value: &str) -> Result<Option<String>> {
        let templates = self.templates;
        let option = GuidedTemplates::lookup(&templates.want, "want", value)?;
        if self.mode != GuidedMode::HaveWant {
            self.select_mode(GuidedMode::HaveWant);
        }
        self.want = Some(option);
        Ok(self.query())
    }

    /// Choose a one-step goal and return its query
    pub fn choose_goal(&mut self, value: &str) -> Result<String> {
        let templates = self.templates;
        let option = GuidedTemplates::lookup(&templates.goals, "goal", value)?;
        self.select_mode(GuidedMode::Goal);
        self.goal = Some(option);
        Ok(option.searches.join(" "))
    }

    pub fn have(&self) -> Option<&'t GuidedOption> {
        self.have
    }

    pub fn want(&self) -> Option<&'t GuidedOption> {
        self.want
    }

    /// The composed search string, if the selection is complete
    #[instrument(name = "stacksift.guided.query", skip(self), fields(mode = ?self.mode))]
    pub fn query(&self) -> Option<String> {
        match self.mode {
            GuidedMode::Goal => self.goal.map(|goal| goal.searches.join(" ")),
            GuidedMode::HaveWant => {
                let action = self.want?.primary_term()?;
                let context = self.have?.primary_term()?;
                Some(format!("{action} {context}"))
            }
        }
    }

    /// The search action to dispatch for a complete selection
    pub fn query_action(&self) -> Option<QueryAction> {
        self.query().map(QueryAction::SetSearch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_templates() {
        let templates = GuidedTemplates::bundled().unwrap();
        assert_eq!(templates.have.len(), 10);
        assert_eq!(templates.want.len(), 10);
        assert_eq!(templates.goals.len(), 15);
        assert_eq!(templates.quick_searches.len(), 8);
    }

    #[test]
    fn test_goal_joins_all_terms() {
        let templates = GuidedTemplates::bundled().unwrap();
        let mut guided = GuidedSearch::new(&templates);
        let query = guided.choose_goal("ml").unwrap();
        assert_eq!(query, "machine learning model train");
        assert_eq!(guided.query().as_deref(), Some("machine learning model train"));
    }

    #[test]
    fn test_action_term_leads_context_term() {
        let templates = GuidedTemplates::bundled().unwrap();
        let mut guided = GuidedSearch::new(&templates);

        guided.choose_have("csv").unwrap();
        assert_eq!(guided.query(), None);

        let query = guided.choose_want("analyze").unwrap();
        assert_eq!(query.as_deref(), Some("analysis csv"));
        assert_eq!(
            guided.query_action(),
            Some(QueryAction::SetSearch("analysis csv".into()))
        );
    }

    #[test]
    fn test_new_first_step_invalidates_second() {
        let templates = GuidedTemplates::bundled().unwrap();
        let mut guided = GuidedSearch::new(&templates);

        guided.choose_have("csv").unwrap();
        guided.choose_want("visualize").unwrap();
        guided.choose_have("images").unwrap();

        assert!(guided.want().is_none());
        assert_eq!(guided.query(), None);

        let query = guided.choose_want("visualize").unwrap();
        assert_eq!(query.as_deref(), Some("visualization image"));
    }

    #[test]
    fn test_mode_switch_clears_selection() {
        let templates = GuidedTemplates::bundled().unwrap();
        let mut guided = GuidedSearch::new(&templates);

        guided.choose_goal("test").unwrap();
        guided.choose_have("pdf").unwrap();
        assert_eq!(guided.mode(), GuidedMode::HaveWant);
        assert_eq!(guided.query(), None);

        guided.select_mode(GuidedMode::Goal);
        assert_eq!(guided.query(), None);
    }

    #[test]
    fn test_unknown_option_is_reported() {
        let templates = GuidedTemplates::bundled().unwrap();
        let mut guided = GuidedSearch::new(&templates);
        let err = guided.choose_want("teleport").unwrap_err();
        assert!(matches!(
            err,
            StacksiftError::UnknownGuidedOption { step: "want", .. }
        ));
    }
}
