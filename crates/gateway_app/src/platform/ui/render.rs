use gateway_core::{
    AppViewModel, CompletionView, NotificationVariant, RecordSummaryView, ScreenView, StatusView,
    StepStatus, ToolView, UploadFormView,
};

const RULE: &str = "------------------------------------------------------------";
const BAR_WIDTH: usize = 30;

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![
        RULE.to_string(),
        format!("Content Gateway  [{}]", view.route),
        RULE.to_string(),
    ];

    match &view.screen {
        ScreenView::Dashboard { latest_upload } => {
            render_dashboard(&mut lines, latest_upload.as_ref())
        }
        ScreenView::Tools(tools) => render_tools(&mut lines, tools),
        ScreenView::Upload(form) => render_upload(&mut lines, form),
        ScreenView::Processing(Some(status)) => render_status(&mut lines, status),
        ScreenView::Processing(None) => {}
        ScreenView::Complete(completion) => render_completion(&mut lines, completion),
        ScreenView::NotFound { path } => {
            lines.push("404".to_string());
            lines.push(format!("Oops! Page not found: {path}"));
            lines.push("Return to Home: `home`".to_string());
        }
    }

    if !view.notifications.is_empty() {
        lines.push(String::new());
        for notification in &view.notifications {
            let marker = match notification.variant {
                NotificationVariant::Info => "i",
                NotificationVariant::Destructive => "!",
            };
            lines.push(format!(
                "[{marker}] {}: {}",
                notification.title, notification.description
            ));
        }
    }
    lines
}

fn render_dashboard(lines: &mut Vec<String>, latest: Option<&RecordSummaryView>) {
    lines.push("Welcome back. Convert course packages into published content.".to_string());
    lines.push("Quick action: `tools` to start a new upload".to_string());
    lines.push(String::new());
    match latest {
        Some(record) => {
            lines.push("Latest upload".to_string());
            render_record(lines, record);
        }
        None => lines.push("No uploads yet in this session.".to_string()),
    }
}

fn render_tools(lines: &mut Vec<String>, tools: &[ToolView]) {
    lines.push("Choose a content source".to_string());
    for tool in tools {
        let badge = if tool.available { "Available" } else { "Coming Soon" };
        lines.push(format!("  {:<14} {:<22} {}", tool.id, tool.name, badge));
        lines.push(format!("  {:<14} {}", "", tool.description));
    }
    lines.push("Open one with `tool <id>`.".to_string());
}

fn render_upload(lines: &mut Vec<String>, form: &UploadFormView) {
    lines.push("Upload Articulate Storyline content".to_string());
    match &form.file {
        Some(file) => lines.push(format!("File:        {} ({})", file.name, file.size_label)),
        None => lines.push(
            "File:        No file selected (`file <path>` or `drop <path>`)".to_string(),
        ),
    }
    lines.push(format!("Name:        {}", form.name));
    lines.push(format!("Description: {}", form.description));
    lines.push(format!("Tags:        {}", form.tags));
    lines.push(String::new());
    if form.can_submit {
        lines.push("[ Start Upload ]  `submit`".to_string());
    } else {
        lines.push("[ Start Upload ]  (choose a file and enter a name)".to_string());
    }
}

fn render_status(lines: &mut Vec<String>, status: &StatusView) {
    lines.push(status.headline.to_string());
    render_record(lines, &status.record);
    lines.push(String::new());
    lines.push(format!(
        "{} {}%  step {} of {}",
        progress_bar(status.percent),
        status.percent,
        status.current_step,
        status.steps.len()
    ));
    for step in &status.steps {
        let mark = match step.status {
            StepStatus::Complete => "[x]",
            StepStatus::Active => "[>]",
            StepStatus::Pending => "[ ]",
        };
        lines.push(format!("  {mark} {}: {}", step.name, step.description));
    }
    lines.push(format!("Estimated time: {}", status.estimate));
}

fn render_completion(lines: &mut Vec<String>, completion: &CompletionView) {
    lines.push("Processing Complete!".to_string());
    if let Some(record) = &completion.summary {
        render_record(lines, record);
    }
    lines.push(format!("Total processing time: {}", completion.processing_time));
    for step in &completion.steps {
        let label = step.duration_label.as_deref().unwrap_or("");
        lines.push(format!("  [x] {:<20} Complete  {label}", step.name));
    }
    lines.push(String::new());
    match &completion.content_url {
        Some(url) => {
            lines.push(format!("Content link: {url}"));
            lines.push("`copy` to copy the link, `open` to view it".to_string());
        }
        None => lines.push("No content link was delivered.".to_string()),
    }
    lines.push("Back to Dashboard: `home`   Upload More Content: `tools`".to_string());
}

fn render_record(lines: &mut Vec<String>, record: &RecordSummaryView) {
    lines.push(format!("  {} ({}, {})", record.name, record.file, record.size_label));
    if let Some(description) = &record.description {
        lines.push(format!("  {description}"));
    }
    if !record.tags.is_empty() {
        let chips: Vec<String> = record.tags.iter().map(|tag| format!("[{tag}]")).collect();
        lines.push(format!("  {}", chips.join(" ")));
    }
    if let Some(seconds) = &record.upload_duration {
        lines.push(format!("  Uploaded in {seconds} s"));
    }
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
