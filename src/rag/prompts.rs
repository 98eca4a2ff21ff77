//! Versioned prompt templates for the interview coach

use std::fmt;

/// Template revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptVersion {
    V1,
    #[default]
    V2,
}

/// How much a hint is allowed to give away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HintLevel {
    /// A guiding question, no technique named
    #[default]
    Nudge,
    /// Names the technique without the algorithm
    Approach,
    /// Step-by-step walkthrough with pseudocode
    Walkthrough,
}

impl HintLevel {
    /// Levels outside 1..=3 fall back to the gentlest hint
    pub fn from_level(level: u8) -> Self {
        match level {
            2 => Self::Approach,
            3 => Self::Walkthrough,
            _ => Self::Nudge,
        }
    }

    pub const fn level(&self) -> u8 {
        match self {
            Self::Nudge => 1,
            Self::Approach => 2,
            Self::Walkthrough => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    AnswerProblem(PromptVersion),
    Hint(HintLevel),
    SystemDesign,
    ExplainPattern,
}

impl Default for PromptKind {
    fn default() -> Self {
        Self::AnswerProblem(PromptVersion::default())
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_v{}", self.name(), self.version())
    }
}

impl PromptKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AnswerProblem(_) => "answer_problem",
            Self::Hint(HintLevel::Nudge) => "hint_level_1",
            Self::Hint(HintLevel::Approach) => "hint_level_2",
            Self::Hint(HintLevel::Walkthrough) => "hint_level_3",
            Self::SystemDesign => "system_design_guide",
            Self::ExplainPattern => "explain_pattern",
        }
    }

    pub const fn version(&self) -> &'static str {
        match self {
            Self::AnswerProblem(PromptVersion::V2) => "2.0",
            _ => "1.0",
        }
    }

    /// Fill the template.
    ///
    /// For hints `context` is the problem description and `question` is the
    /// student's attempt so far.
    pub fn render(&self, context: &str, question: &str) -> String {
        match self {
            Self::AnswerProblem(PromptVersion::V1) => answer_problem_v1(context, question),
            Self::AnswerProblem(PromptVersion::V2) => answer_problem_v2(context, question),
            Self::Hint(level) => {
                let attempt = if question.trim().is_empty() {
                    "No attempt yet"
                } else {
                    question
                };
                hint(*level, context, attempt)
            }
            Self::SystemDesign => system_design(context, question),
            Self::ExplainPattern => explain_pattern(context, question),
        }
    }
}

fn answer_problem_v1(context: &str, question: &str) -> String {
    format!(
        r"You are an expert interview coach helping a student understand a technical problem.

## Retrieved Problem Context
{context}

## Student's Question
{question}

## Instructions
1. If the question is about a specific problem, explain the approach clearly
2. Break down the solution into logical steps
3. Explain the time and space complexity
4. Mention common pitfalls or edge cases
5. If the context doesn't fully answer the question, acknowledge what's missing

Provide a clear, educational explanation that covers why the approach works, not only what to do."
    )
}

fn answer_problem_v2(context: &str, question: &str) -> String {
    format!(
        r"You are an expert coding interview coach. Help the student understand the problem pattern rather than memorize a solution.

## Retrieved Context
{context}

## Student's Question
{question}

## Response Format
### Pattern Recognition
Which algorithmic pattern applies (e.g. Two Pointers, Sliding Window, DFS)?

### Intuition
The core insight that makes the solution work.

### Approach
Step-by-step solution strategy.

### Complexity Analysis
- Time: O(?)
- Space: O(?)

### Edge Cases
Inputs that break a naive solution.

### Similar Problems
Other problems that use the same pattern."
    )
}

fn hint(level: HintLevel, problem: &str, attempt: &str) -> String {
    let instructions = match level {
        HintLevel::Nudge => {
            r"- Do not give away the solution or name the algorithm
- Ask one guiding question that helps them think differently
- Keep it to 1-2 sentences"
        }
        HintLevel::Approach => {
            r"- Suggest the general approach or data structure to consider
- You may name the technique (e.g. two pointers) and say why it helps
- Do not give the full algorithm
- Keep it to 3-4 sentences"
        }
        HintLevel::Walkthrough => {
            r"- Walk through the approach step by step
- Pseudocode is fine, complete code is not
- Explain the key insight so they can implement it themselves"
        }
    };

    format!(
        r"You are helping a student who is stuck on a coding problem.

## Problem
{problem}

## What the student has tried
{attempt}

## Instructions
{instructions}"
    )
}

fn system_design(context: &str, focus: &str) -> String {
    format!(
        r"You are an expert system design interviewer helping a candidate work through a design problem.

## Retrieved Context
{context}

## Candidate's Current Focus
{focus}

## Instructions
1. If requirements are not clarified yet, prompt the candidate to do so
2. If they are stuck on a component, explain the trade-offs
3. Reference concepts from the context when relevant
4. Keep it conversational and ask probing questions"
    )
}

fn explain_pattern(context: &str, question: &str) -> String {
    format!(
        r"You are a coding interview coach explaining an algorithmic pattern.

## Example Problems
{context}

## Question
{question}

## Instructions
1. Name the pattern and the signals in a problem statement that suggest it
2. Show how it applies to each example problem above
3. Give the typical time and space complexity
4. List common mistakes when applying it"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_inserts_context_and_question() {
        let prompt = PromptKind::default().render("[1] Two Sum", "How do I solve it?");
        assert!(prompt.contains("[1] Two Sum"));
        assert!(prompt.contains("How do I solve it?"));
        assert!(prompt.contains("### Pattern Recognition"));
    }

    #[test]
    fn test_versions_differ() {
        let v1 = PromptKind::AnswerProblem(PromptVersion::V1).render("c", "q");
        let v2 = PromptKind::AnswerProblem(PromptVersion::V2).render("c", "q");
        assert_ne!(v1, v2);
        assert_eq!(PromptKind::AnswerProblem(PromptVersion::V1).to_string(), "answer_problem_v1.0");
    }

    #[test]
    fn test_hint_levels() {
        assert_eq!(HintLevel::from_level(2), HintLevel::Approach);
        assert_eq!(HintLevel::from_level(9), HintLevel::Nudge);
        assert_eq!(PromptKind::Hint(HintLevel::Walkthrough).name(), "hint_level_3");

        let prompt = PromptKind::Hint(HintLevel::Nudge).render("Two Sum", "  ");
        assert!(prompt.contains("No attempt yet"));
    }
}
