// Prompt text fragments for the composer.

/// Closing paragraph appended to every composed prompt.
pub const CLOSING_INSTRUCTION: &str = "Please produce a complete, well-structured response \
    for the task above. Label sections clearly if appropriate and keep responses within \
    reasonable length.";

/// Formats offered by the UI. The composer accepts any free text.
pub const PREDEFINED_FORMATS: &[&str] = &[
    "Research report",
    "Project report",
    "Blog post",
    "Email",
    "Code",
    "Presentation outline",
    "Bullet summary",
];

/// Styles offered by the UI.
pub const PREDEFINED_STYLES: &[&str] = &[
    "Professional",
    "Casual",
    "Funky",
    "Academic",
    "Concise",
    "Humorous",
];
