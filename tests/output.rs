use taskdeck::output::{format_human, HumanOutput};

#[test]
fn format_human_includes_sections() {
    let mut human = HumanOutput::new("Task added");
    human.push_summary("ID", "9f2c41aa");
    human.push_detail("[high] 9f2c41aa Write report (due tomorrow)");
    human.push_warning("task was already completed");
    human.push_next_step("taskdeck list --all");

    let rendered = format_human(&human);
    assert!(rendered.contains("Task added"));
    assert!(rendered.contains("Summary:"));
    assert!(rendered.contains("- ID: 9f2c41aa"));
    assert!(rendered.contains("Details:"));
    assert!(rendered.contains("- [high] 9f2c41aa Write report (due tomorrow)"));
    assert!(rendered.contains("Warnings:"));
    assert!(rendered.contains("- task was already completed"));
    assert!(rendered.contains("Next steps:"));
    assert!(rendered.contains("- taskdeck list --all"));
}

#[test]
fn format_human_omits_empty_sections() {
    let human = HumanOutput::new("Filters cleared");
    let rendered = format_human(&human);
    assert_eq!(rendered, "Filters cleared");
}
