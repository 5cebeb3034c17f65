//! Playback report text generator (Telegram HTML).

use super::escape_html;
use crate::models::playback::{ContentStats, PlaybackReport, ReportKind};

/// Format seconds as hours and minutes.
pub fn format_duration(seconds: f64) -> String {
    let total_minutes = (seconds.max(0.0) / 60.0).floor() as u64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{}小时{}分钟", hours, minutes)
    } else {
        format!("{}分钟", minutes)
    }
}

fn push_content(lines: &mut Vec<String>, heading: &str, items: &[ContentStats]) {
    if items.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!("<b>{}</b>", heading));
    for (i, item) in items.iter().enumerate() {
        lines.push(format!(
            "{}. {} - {}次 ({}人)",
            i + 1,
            escape_html(&item.item_name),
            item.play_count,
            item.unique_viewers
        ));
    }
}

/// Render a report for Telegram.
pub fn format_report_for_telegram(report: &PlaybackReport) -> String {
    let title = match report.kind {
        ReportKind::Daily => "📊 <b>每日观影报告</b>",
        ReportKind::Weekly => "📊 <b>每周观影报告</b>",
    };

    let mut lines = vec![
        title.to_string(),
        format!(
            "📅 {} ~ {}",
            report.start_date.format("%Y-%m-%d"),
            report.end_date.format("%Y-%m-%d")
        ),
        String::new(),
        format!("▶️ 播放次数：{}", report.total_plays),
        format!("⏱ 观看时长：{}", format_duration(report.total_duration)),
        format!("👥 活跃用户：{}", report.active_users),
    ];

    if report.total_plays == 0 {
        lines.push(String::new());
        lines.push("暂无播放记录".to_string());
        return lines.join("\n");
    }

    if !report.top_users.is_empty() {
        lines.push(String::new());
        lines.push("<b>🏆 用户排行</b>".to_string());
        for (i, user) in report.top_users.iter().enumerate() {
            lines.push(format!(
                "{}. {} - {}次 ({})",
                i + 1,
                escape_html(&user.user_name),
                user.total_play_count,
                format_duration(user.total_duration)
            ));
        }
    }

    push_content(&mut lines, "🎬 热门电影", &report.top_movies);
    push_content(&mut lines, "📺 热门剧集", &report.top_shows);

    lines.join("\n")
}
