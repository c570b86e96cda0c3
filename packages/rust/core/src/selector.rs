//! Row selection: which rows produce images, and under what file stem.

use sheetsync_shared::{DownloadEntry, SponsorNewsRow, SponsorRow};

/// One entry per publishable sponsor with both an id and a logo URL.
pub fn select_sponsor_images(rows: &[SponsorRow]) -> Vec<DownloadEntry> {
    rows.iter()
        .filter(|r| r.is_publishable() && !r.id.is_empty() && !r.image.is_empty())
        .map(|r| DownloadEntry::new(&r.id, &r.image))
        .collect()
}

/// Two entries per complete, publishable news row: horizontal, then vertical.
///
/// A row missing either image (or either id) contributes nothing.
pub fn select_sponsor_news_images(rows: &[SponsorNewsRow]) -> Vec<DownloadEntry> {
    rows.iter()
        .filter(|r| {
            r.is_publishable()
                && !r.sponsor_id.is_empty()
                && !r.news_id.is_empty()
                && !r.image_horizontal.is_empty()
                && !r.image_vertical.is_empty()
        })
        .flat_map(|r| {
            let base = format!("{}-{}", r.sponsor_id, r.news_id);
            [
                DownloadEntry::new(format!("{base}-horizontal"), &r.image_horizontal),
                DownloadEntry::new(format!("{base}-vertical"), &r.image_vertical),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sponsor(id: &str, image: &str, flag: &str) -> SponsorRow {
        SponsorRow {
            id: id.into(),
            image: image.into(),
            can_publish: flag.into(),
            ..Default::default()
        }
    }

    fn news(sponsor_id: &str, news_id: &str, h: &str, v: &str, flag: &str) -> SponsorNewsRow {
        SponsorNewsRow {
            sponsor_id: sponsor_id.into(),
            news_id: news_id.into(),
            image_horizontal: h.into(),
            image_vertical: v.into(),
            can_publish: flag.into(),
            ..Default::default()
        }
    }

    #[test]
    fn sponsor_without_id_is_dropped() {
        let rows = vec![
            sponsor("a", "http://x/1.png", "Y"),
            sponsor("", "http://x/2.png", "Y"),
        ];
        assert_eq!(
            select_sponsor_images(&rows),
            vec![DownloadEntry::new("a", "http://x/1.png")]
        );
    }

    #[test]
    fn sponsor_requires_exact_flag_and_image() {
        let rows = vec![
            sponsor("no-image", "", "Y"),
            sponsor("unpublished", "http://x/3.png", "N"),
            sponsor("lowercase", "http://x/4.png", "y"),
            sponsor("blank-flag", "http://x/5.png", ""),
            sponsor("ok", "http://x/6.png", "Y"),
        ];
        let plan = select_sponsor_images(&rows);
        assert_eq!(plan, vec![DownloadEntry::new("ok", "http://x/6.png")]);
    }

    #[test]
    fn sponsor_plan_follows_row_order() {
        let rows = vec![
            sponsor("b", "http://x/b.png", "Y"),
            sponsor("a", "http://x/a.png", "Y"),
            sponsor("b", "http://x/b2.png", "Y"),
        ];
        let stems: Vec<_> = select_sponsor_images(&rows)
            .into_iter()
            .map(|e| e.stem)
            .collect();
        assert_eq!(stems, vec!["b", "a", "b"]);
    }

    #[test]
    fn news_row_fans_out_horizontal_first() {
        let rows = vec![news("s1", "n1", "http://x/h.png", "http://x/v.png", "Y")];
        assert_eq!(
            select_sponsor_news_images(&rows),
            vec![
                DownloadEntry::new("s1-n1-horizontal", "http://x/h.png"),
                DownloadEntry::new("s1-n1-vertical", "http://x/v.png"),
            ]
        );
    }

    #[test]
    fn incomplete_news_rows_yield_nothing() {
        let rows = vec![
            news("", "n1", "http://x/h.png", "http://x/v.png", "Y"),
            news("s1", "", "http://x/h.png", "http://x/v.png", "Y"),
            news("s1", "n2", "", "http://x/v.png", "Y"),
            news("s1", "n3", "http://x/h.png", "", "Y"),
            news("s1", "n4", "http://x/h.png", "http://x/v.png", "N"),
        ];
        assert!(select_sponsor_news_images(&rows).is_empty());
    }

    #[test]
    fn news_plan_is_two_entries_per_qualifying_row() {
        let rows = vec![
            news("s1", "n1", "http://x/1h", "http://x/1v", "Y"),
            news("s1", "n2", "", "http://x/2v", "Y"),
            news("s2", "n1", "http://x/3h", "http://x/3v", "Y"),
        ];
        let stems: Vec<_> = select_sponsor_news_images(&rows)
            .into_iter()
            .map(|e| e.stem)
            .collect();
        assert_eq!(
            stems,
            vec![
                "s1-n1-horizontal",
                "s1-n1-vertical",
                "s2-n1-horizontal",
                "s2-n1-vertical"
            ]
        );
    }
}
