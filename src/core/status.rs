//! Status resolver: derives a title's availability from TMDB metadata.
//!
//! Everything here is pure; "today" is passed in by the caller.

use crate::models::media::MediaKind;
use crate::models::metadata::{
    ProviderEntry, RegionProviders, ReleaseDates, TitleDetails, WatchProviders,
};
use crate::models::status::{MediaStatus, MediaStatusResolution, ReleaseDateSet};
use chrono::NaiveDate;

/// Regions checked for providers, in order.
pub const PREFERRED_REGIONS: [&str; 8] = ["CN", "US", "HK", "TW", "JP", "KR", "SG", "GB"];

/// TMDB release types.
pub const RELEASE_THEATRICAL: u8 = 3;
pub const RELEASE_DIGITAL: u8 = 4;
pub const RELEASE_PHYSICAL: u8 = 5;

/// Raw provider names mapped to the names shown on badges.
const PROVIDER_NAMES: &[(&str, &str)] = &[
    ("Tencent Video", "WeTV"),
    ("WeTV", "WeTV"),
    ("iQIYI", "iQIYI"),
    ("Youku", "Youku"),
    ("Bilibili", "Bilibili"),
    ("Mango TV", "Mango TV"),
    ("Netflix", "Netflix"),
    ("Disney Plus", "Disney+"),
    ("Amazon Prime Video", "Prime Video"),
    ("Apple TV", "Apple TV+"),
    ("Apple TV Plus", "Apple TV+"),
    ("HBO Max", "HBO Max"),
    ("Max", "HBO Max"),
    ("Hulu", "Hulu"),
    ("Peacock", "Peacock"),
    ("Paramount Plus", "Paramount+"),
    ("Google Play Movies", "Google Play"),
    ("YouTube", "YouTube"),
];

/// Brand badge classes, matched by substring against the platform label.
const BADGE_STYLES: &[(&str, &str)] = &[
    ("Netflix", "bg-[#E50914] text-white border-transparent shadow-md shadow-red-900/20"),
    ("Disney+", "bg-[#01147C] text-white border-white/10 shadow-md shadow-blue-900/20"),
    ("Prime Video", "bg-[#00A8E1] text-black border-transparent shadow-md shadow-cyan-900/20"),
    ("Apple TV+", "bg-black text-white border border-white/20 shadow-md shadow-gray-900/20"),
    ("WeTV", "bg-[#ff6b00] text-white border-transparent shadow-md shadow-orange-900/20"),
    ("iQIYI", "bg-[#00cc36] text-white border-transparent shadow-md shadow-green-900/20"),
    ("Youku", "bg-[#2883ff] text-white border-transparent shadow-md shadow-blue-900/20"),
    ("Bilibili", "bg-[#fb7299] text-white border-transparent shadow-md shadow-pink-900/20"),
    ("Mango TV", "bg-[#ff5f00] text-white border-transparent shadow-md shadow-orange-900/20"),
    ("HBO Max", "bg-[#5418e9] text-white border-transparent shadow-md shadow-purple-900/20"),
    ("Hulu", "bg-[#1ce783] text-black border-transparent shadow-md shadow-green-900/20"),
    ("YouTube", "bg-[#FF0000] text-white border-transparent shadow-md shadow-red-900/20"),
    ("Google Play", "bg-white text-slate-800 border-slate-200 shadow-md"),
];

/// How a provider offers the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferType {
    Flatrate,
    Buy,
    Rent,
}

impl OfferType {
    fn suffix(&self) -> &'static str {
        match self {
            OfferType::Flatrate => "",
            OfferType::Buy => " (购)",
            OfferType::Rent => " (租)",
        }
    }
}

/// Provider selected for a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderHit {
    /// Badge label, including buy/rent suffix or fallback region.
    pub platform: String,
    pub region: String,
    pub offer: OfferType,
}

/// Map a raw TMDB provider name to its display name.
pub fn provider_display_name(raw: &str) -> &str {
    PROVIDER_NAMES
        .iter()
        .find(|(name, _)| *name == raw)
        .map(|(_, display)| *display)
        .unwrap_or(raw)
}

/// Brand style class for a platform label, if it contains a known brand.
pub fn badge_color_class(platform: &str) -> Option<&'static str> {
    BADGE_STYLES
        .iter()
        .find(|(brand, _)| platform.contains(brand))
        .map(|(_, class)| *class)
}

fn first_offer(region: &RegionProviders) -> Option<(&ProviderEntry, OfferType)> {
    [
        (&region.flatrate, OfferType::Flatrate),
        (&region.buy, OfferType::Buy),
        (&region.rent, OfferType::Rent),
    ]
    .into_iter()
    .find_map(|(list, offer)| list.first().map(|entry| (entry, offer)))
}

/// Pick the provider for a title.
///
/// Preferred regions are checked first, in [`PREFERRED_REGIONS`] order. If
/// none of them has an offer, the remaining regions are scanned in ascending
/// region-code order and the hit is labelled with its region.
pub fn resolve_provider(providers: &WatchProviders) -> Option<ProviderHit> {
    for region in PREFERRED_REGIONS {
        let Some((entry, offer)) = providers.results.get(region).and_then(first_offer) else {
            continue;
        };
        return Some(ProviderHit {
            platform: format!("{}{}", provider_display_name(&entry.provider_name), offer.suffix()),
            region: region.to_string(),
            offer,
        });
    }

    providers.results.iter().find_map(|(region, offers)| {
        first_offer(offers).map(|(entry, offer)| ProviderHit {
            platform: format!("{} ({})", provider_display_name(&entry.provider_name), region),
            region: region.clone(),
            offer,
        })
    })
}

/// Parse `YYYY-MM-DD` or the date part of an ISO timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.trim().split('T').next()?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn region_priority(region: &str) -> u8 {
    match region {
        "CN" => 2,
        "US" => 1,
        _ => 0,
    }
}

/// Best date of one release type: highest region priority, then lowest
/// region code.
pub fn best_release_date(release_dates: &ReleaseDates, release_type: u8) -> Option<NaiveDate> {
    release_dates
        .results
        .iter()
        .filter_map(|country| {
            country
                .release_dates
                .iter()
                .filter(|d| d.release_type == release_type)
                .find_map(|d| parse_date(&d.release_date))
                .map(|date| {
                    let code = country.iso_3166_1.as_str();
                    (region_priority(code), code, date)
                })
        })
        .min_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)))
        .map(|(_, _, date)| date)
}

fn collect_release_dates(release_dates: &ReleaseDates) -> ReleaseDateSet {
    ReleaseDateSet {
        theatrical: best_release_date(release_dates, RELEASE_THEATRICAL),
        digital: best_release_date(release_dates, RELEASE_DIGITAL),
        physical: best_release_date(release_dates, RELEASE_PHYSICAL),
    }
}

fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Resolve status, badge and display date for one title.
pub fn resolve_status(
    details: &TitleDetails,
    providers: Option<&WatchProviders>,
    kind: MediaKind,
    today: NaiveDate,
) -> MediaStatusResolution {
    let provider = providers.and_then(resolve_provider);
    let platform = provider.as_ref().map(|p| p.platform.clone());
    let provider_region = provider.as_ref().map(|p| p.region.clone());
    let badge_color_class = platform
        .as_deref()
        .and_then(badge_color_class)
        .map(str::to_string);

    let (status, badge_label, release_date, release_dates) = match kind {
        MediaKind::Movie => resolve_movie(details, platform.as_deref(), today),
        MediaKind::Tv => resolve_tv(details, platform.as_deref(), today),
    };

    MediaStatusResolution {
        status,
        badge_label,
        badge_color_class,
        platform,
        provider_region,
        release_date,
        release_dates,
    }
}

fn resolve_movie(
    details: &TitleDetails,
    platform: Option<&str>,
    today: NaiveDate,
) -> (MediaStatus, String, String, ReleaseDateSet) {
    let release_dates = details
        .release_dates
        .as_ref()
        .map(collect_release_dates)
        .unwrap_or_default();
    let digital = release_dates.digital;
    let theatrical = release_dates
        .theatrical
        .or_else(|| details.release_date.as_deref().and_then(parse_date));

    let (status, badge, date) = if let Some(platform) = platform {
        let date = digital
            .or(theatrical)
            .map(fmt_date)
            .unwrap_or_else(|| "已上线".to_string());
        (MediaStatus::Streaming, platform.to_string(), date)
    } else if let Some(digital) = digital.filter(|d| *d <= today) {
        (MediaStatus::Streaming, "数字版已出".to_string(), fmt_date(digital))
    } else if let Some(theatrical) = theatrical.filter(|d| *d <= today) {
        (MediaStatus::Released, "已上映".to_string(), fmt_date(theatrical))
    } else {
        let date = theatrical.map(fmt_date).unwrap_or_else(|| "待定".to_string());
        (MediaStatus::Pending, "待上映".to_string(), date)
    };

    (status, badge, date, release_dates)
}

fn resolve_tv(
    details: &TitleDetails,
    platform: Option<&str>,
    today: NaiveDate,
) -> (MediaStatus, String, String, ReleaseDateSet) {
    let first_air = details.first_air_date.as_deref().and_then(parse_date);
    let last_air = details
        .last_episode_to_air
        .as_ref()
        .and_then(|e| e.air_date.as_deref())
        .filter(|d| !d.is_empty());

    let (status, badge, date) = if let Some(platform) = platform {
        let date = last_air
            .map(|d| format!("更新至{}", d))
            .unwrap_or_else(|| "热播中".to_string());
        (MediaStatus::Streaming, platform.to_string(), date)
    } else if let Some(first_air) = first_air.filter(|d| *d <= today) {
        (MediaStatus::Released, "已开播".to_string(), fmt_date(first_air))
    } else {
        let date = first_air.map(fmt_date).unwrap_or_else(|| "待定".to_string());
        (MediaStatus::Pending, "待开播".to_string(), date)
    };

    (status, badge, date, ReleaseDateSet::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 10);
        assert_eq!(parse_date("2024-01-10"), expected);
        assert_eq!(parse_date("2024-01-10T00:00:00.000Z"), expected);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("TBA"), None);
    }

    #[test]
    fn test_provider_display_name() {
        assert_eq!(provider_display_name("Disney Plus"), "Disney+");
        assert_eq!(provider_display_name("Max"), "HBO Max");
        assert_eq!(provider_display_name("Crunchyroll"), "Crunchyroll");
    }

    #[test]
    fn test_badge_color_substring_match() {
        assert!(badge_color_class("WeTV (TH)").is_some());
        assert!(badge_color_class("Netflix (购)").is_some());
        assert_eq!(badge_color_class("Crunchyroll"), None);
    }
}
