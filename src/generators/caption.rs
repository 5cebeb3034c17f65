//! Notification caption generator (Telegram HTML).

use super::{escape_html, truncate_chars};
use crate::core::notify::{EpisodeRef, Notification, NotificationKind, NotifiedItem};

const OVERVIEW_MAX_CHARS: usize = 150;
/// Episodes listed before the rest are summarized.
const EPISODES_LISTED: usize = 10;

fn title_line(item: &NotifiedItem) -> String {
    let title = escape_html(&item.title);
    match &item.year {
        Some(year) => format!("{} ({})", title, year),
        None => title,
    }
}

fn format_episodes(episodes: &[EpisodeRef]) -> String {
    let mut listed: Vec<String> = episodes
        .iter()
        .take(EPISODES_LISTED)
        .map(|e| format!("S{:02}E{:02}", e.season, e.episode))
        .collect();
    if episodes.len() > EPISODES_LISTED {
        listed.push(format!("等{}集", episodes.len()));
    }
    listed.join(", ")
}

/// Caption for a notification.
pub fn render_caption(notification: &Notification) -> String {
    let item = &notification.item;
    let mut lines = Vec::new();

    match notification.kind {
        NotificationKind::Request => {
            lines.push("📥 <b>新的求片</b>".to_string());
            lines.push(format!("<b>{}</b> {}", title_line(item), item.kind.tag()));
            lines.push(format!("求片用户：{}", escape_html(&notification.requested_by)));
        }
        NotificationKind::Completed => {
            lines.push(format!("✅ <b>{} 已入库</b>", title_line(item)));
            lines.push(item.kind.tag().to_string());
            lines.push(format!("求片用户：{}", escape_html(&notification.requested_by)));
        }
        NotificationKind::AutoScan => {
            lines.push(format!("🆕 <b>{} 已入库</b>", title_line(item)));
            lines.push(item.kind.tag().to_string());
            if !item.new_episodes.is_empty() {
                lines.push(format!("新增剧集：{}", format_episodes(&item.new_episodes)));
            }
        }
    }

    if let Some(overview) = item.overview.as_deref().filter(|o| !o.is_empty()) {
        lines.push(String::new());
        lines.push(escape_html(&truncate_chars(overview, OVERVIEW_MAX_CHARS)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::MediaKind;

    fn notification(kind: NotificationKind, item: NotifiedItem) -> Notification {
        Notification {
            kind,
            item,
            requested_by: "alice".to_string(),
            poster_override: None,
        }
    }

    #[test]
    fn test_request_caption() {
        let mut item = NotifiedItem::bare(MediaKind::Movie, "550");
        item.title = "搏击俱乐部".to_string();
        item.year = Some("1999".to_string());
        let caption = render_caption(&notification(NotificationKind::Request, item));
        assert!(caption.contains("<b>搏击俱乐部 (1999)</b> #电影"));
        assert!(caption.contains("求片用户：alice"));
    }

    #[test]
    fn test_auto_scan_lists_episodes() {
        let mut item = NotifiedItem::bare(MediaKind::Tv, "1396");
        item.new_episodes = vec![
            EpisodeRef { season: 1, episode: 1 },
            EpisodeRef { season: 1, episode: 2 },
        ];
        let caption = render_caption(&notification(NotificationKind::AutoScan, item));
        assert!(caption.contains("#剧集"));
        assert!(caption.contains("新增剧集：S01E01, S01E02"));
        assert!(!caption.contains("求片用户"));
    }

    #[test]
    fn test_long_episode_list_summarized() {
        let episodes: Vec<EpisodeRef> = (1..=12)
            .map(|e| EpisodeRef { season: 2, episode: e })
            .collect();
        let text = format_episodes(&episodes);
        assert!(text.starts_with("S02E01"));
        assert!(text.ends_with("等12集"));
        assert!(!text.contains("S02E11"));
    }
}
