#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::{json, Value};

    use crate::tools::analyze::group::{assign_groups, key_similarity, token_sort_key, tokens};
    use crate::tools::analyze::score::score;
    use crate::tools::analyze::*;
    use crate::types::{format_timestamp, DateWindow};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 5, 12, 0, 0).unwrap()
    }

    fn batch(value: Value) -> Vec<InputRecord> {
        parse_batch(&value.to_string(), now()).unwrap()
    }

    fn sample() -> Value {
        json!([
            {
                "url": "https://haohuo.douyin.com/goods/1",
                "title": "新疆特级核桃500g",
                "price": 39.9,
                "origin": " 新疆 ",
                "shop_name": "阿克苏果园",
                "description": "新疆产地核桃手剥",
                "scrape_time": format_timestamp(&now()),
                "raw_text_snippet": "..."
            },
            {
                "url": "https://haohuo.douyin.com/goods/2",
                "title": "新疆特级核桃 500G",
                "origin": "新疆",
                "description": "新疆核桃 手剥",
                "scrape_time": format_timestamp(&now())
            },
            {
                "url": "https://haohuo.douyin.com/goods/3",
                "title": "云南纸皮核桃1kg",
                "scrape_time": format_timestamp(&now())
            },
            {
                "url": "https://haohuo.douyin.com/goods/4",
                "title": "新疆特级核桃500g",
                "description": "新疆产地核桃手剥",
                "scrape_time": format_timestamp(&(now() - Duration::days(40)))
            }
        ])
    }

    #[test]
    fn test_end_to_end_example() {
        let out = Analyzer::default().analyze_at(batch(sample()), now());
        let urls: Vec<&str> = out.iter().map(|r| r.record.url.as_str()).collect();
        assert_eq!(
            urls,
            [
                "https://haohuo.douyin.com/goods/1",
                "https://haohuo.douyin.com/goods/2",
                "https://haohuo.douyin.com/goods/3",
            ]
        );

        // 8 chars, all four keywords, preferred region
        assert_eq!(out[0].desc_len, 8);
        assert_eq!(out[0].score, 8 + 200 + 200);
        assert_eq!(out[0].record.origin, "新疆");

        // 7 chars, three keywords (no 产地), preferred region
        assert_eq!(out[1].desc_len, 7);
        assert_eq!(out[1].score, 7 + 150 + 200);

        // no description: no features, title is not consulted
        assert_eq!(out[2].desc_len, 0);
        assert_eq!(out[2].score, 0);
        assert_eq!(out[2].record.origin, "");

        assert_eq!(out[0].comp_group, out[1].comp_group);
        assert_ne!(out[0].comp_group, out[2].comp_group);
    }

    #[test]
    fn test_rolling_window_boundary_is_inclusive() {
        let cutoff = now() - Duration::days(30);
        let input = json!([
            {"url": "https://a.com/goods/edge", "scrape_time": format_timestamp(&cutoff)},
            {"url": "https://a.com/goods/old", "scrape_time": format_timestamp(&(cutoff - Duration::microseconds(1)))}
        ]);
        let out = Analyzer::default().analyze_at(batch(input), now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].record.url, "https://a.com/goods/edge");
    }

    #[test]
    fn test_oversized_rolling_window_keeps_everything() {
        let input = json!([
            {"url": "https://a.com/goods/old", "scrape_time": format_timestamp(&(now() - Duration::days(40)))},
            {"url": "https://a.com/goods/new", "scrape_time": format_timestamp(&now())}
        ]);
        for days in [100_000_000, i64::MAX] {
            let cfg = AnalysisConfig {
                window: TimeWindow::Rolling { days },
                ..AnalysisConfig::default()
            };
            let out = Analyzer::new(cfg).analyze_at(batch(input.clone()), now());
            assert_eq!(out.len(), 2);
        }
        assert!(TimeWindow::Rolling { days: i64::MAX }.contains(DateTime::<Utc>::MIN_UTC, now()));
    }

    #[test]
    fn test_literal_date_window() {
        let cfg = AnalysisConfig {
            window: TimeWindow::Range(DateWindow::parse("2025-08-01", "2025-08-31").unwrap()),
            ..AnalysisConfig::default()
        };
        let input = json!([
            {"url": "https://a.com/goods/in", "scrape_time": "2025-08-31T23:59:59Z"},
            {"url": "https://a.com/goods/out", "scrape_time": "2025-09-01T00:00:00Z"}
        ]);
        let out = Analyzer::new(cfg).analyze_at(batch(input), now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].record.url, "https://a.com/goods/in");
    }

    #[test]
    fn test_missing_or_bad_scrape_time_is_stamped_now() {
        let input = json!([
            {"url": "https://a.com/goods/1"},
            {"url": "https://a.com/goods/2", "scrape_time": "last tuesday"},
            {"url": "https://a.com/goods/3", "scrape_time": null}
        ]);
        let records = batch(input);
        assert!(records.iter().all(|r| r.record.scrape_time == now()));
        assert_eq!(Analyzer::default().analyze_at(records, now()).len(), 3);
    }

    #[test]
    fn test_malformed_fields_default_instead_of_failing() {
        let input = json!([
            {"url": "https://a.com/goods/1", "title": 42, "price": "12.5", "description": ["x"]},
            {"title": "no url", "price": "cheap", "origin": false},
            "not a record",
            null
        ]);
        let records = batch(input);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record.title, "42");
        assert_eq!(records[0].record.price, Some(12.5));
        assert_eq!(records[0].record.description, None);
        assert_eq!(records[1].record.url, "");
        assert_eq!(records[1].record.price, None);
        assert_eq!(records[1].record.origin, "");
    }

    #[test]
    fn test_non_array_input_is_fatal() {
        assert!(parse_batch(r#"{"url": "x"}"#, now()).is_err());
        assert!(parse_batch("[1, 2", now()).is_err());
    }

    #[test]
    fn test_load_batch_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.json");
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();
        let err = load_batch(&path, now()).unwrap_err();
        assert!(matches!(err, crate::error::ProwlError::Input { .. }));
        assert!(err.to_string().contains("raw.json"));
    }

    #[test]
    fn test_score_depends_only_on_own_fields() {
        let all = Analyzer::default().analyze_at(batch(sample()), now());
        for record in &all {
            let alone = Analyzer::default().analyze_at(vec![InputRecord::from(record.record.clone())], now());
            assert_eq!(alone[0].score, record.score);
        }
    }

    #[test]
    fn test_origin_inferred_from_text_when_missing() {
        let input = json!([
            {"url": "https://a.com/goods/1", "description": "来自新疆的核桃"},
            {"url": "https://a.com/goods/2", "description": "山东核桃", "origin": "  "}
        ]);
        let out = Analyzer::default().analyze_at(batch(input), now());
        assert_eq!(out[0].record.origin, "新疆");
        assert_eq!(out[0].score, 7 + 100 + 200);
        assert_eq!(out[1].record.origin, "");
    }

    #[test]
    fn test_title_is_not_analysis_text() {
        let input = json!([
            {"url": "https://a.com/goods/1", "title": "新疆手剥核桃"},
            {"url": "https://a.com/goods/2", "title": "新疆手剥核桃", "description": "   "}
        ]);
        let out = Analyzer::default().analyze_at(batch(input), now());
        assert_eq!(out[0].desc_len, 0);
        assert_eq!(out[0].score, 0);
        assert_eq!(out[0].record.origin, "");
        assert_eq!(out[1].desc_len, 3);
        assert_eq!(out[1].score, 3);
        assert_eq!(out[1].record.origin, "");
    }

    #[test]
    fn test_score_saturates_instead_of_overflowing() {
        let cfg = AnalysisConfig {
            keyword_weight: u64::MAX,
            region_bonus: u64::MAX,
            ..AnalysisConfig::default()
        };
        assert_eq!(score(10, 4, "新疆", &cfg), u64::MAX);
        assert_eq!(score(usize::MAX, 0, "", &AnalysisConfig::default()), usize::MAX as u64);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = json!([
            {"url": "https://a.com/goods/1", "title": "aaaa"},
            {"url": "https://a.com/goods/2", "title": "bbbb"},
            {"url": "https://a.com/goods/3", "title": "cccc"}
        ]);
        let out = Analyzer::default().analyze_at(batch(input), now());
        let urls: Vec<&str> = out.iter().map(|r| r.record.url.as_str()).collect();
        assert_eq!(
            urls,
            ["https://a.com/goods/1", "https://a.com/goods/2", "https://a.com/goods/3"]
        );
    }

    #[test]
    fn test_tokens_split_on_script_changes() {
        assert_eq!(tokens("新疆特级核桃500g"), ["新疆特级核桃", "500g"]);
        assert_eq!(tokens("  新疆特级核桃 500Ｇ "), ["新疆特级核桃", "500g"]);
        assert_eq!(token_sort_key("新疆特级核桃500g"), token_sort_key("新疆特级核桃 500G"));
        assert_eq!(token_sort_key("walnut, big"), "big walnut");
        assert!(tokens("-- !!").is_empty());
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let titles = ["新疆特级核桃500g", "云南纸皮核桃1kg", "walnut big", "big walnuts", ""];
        for a in titles {
            for b in titles {
                let (ka, kb) = (token_sort_key(a), token_sort_key(b));
                assert_eq!(key_similarity(&ka, &kb), key_similarity(&kb, &ka));
            }
        }
    }

    #[test]
    fn test_similarity_is_relative_to_combined_length() {
        // one substitution is two edits over eight chars
        assert_eq!(key_similarity("abcd", "abce"), 75.0);
        assert_eq!(key_similarity("abc", "abc"), 100.0);
        assert_eq!(key_similarity("ab", "abcd"), 200.0 * 2.0 / 6.0);
        assert_eq!(key_similarity("abc", "xyz"), 0.0);
        assert_eq!(key_similarity("", "abc"), 0.0);
    }

    #[test]
    fn test_grouping_is_greedy_and_order_dependent() {
        // x~y and y~z sit exactly at the threshold; x~z does not.
        let (x, y, z) = ("aaaaaaaaaa", "aaaaaaaabb", "aaaaaabbbb");
        assert_eq!(assign_groups(&[x, y, z], 80.0), [0, 0, 1]);
        assert_eq!(assign_groups(&[y, x, z], 80.0), [0, 0, 0]);
        assert_eq!(assign_groups(&[x, y, z], 80.0), assign_groups(&[x, y, z], 80.0));
    }

    #[test]
    fn test_empty_titles_form_singletons() {
        assert_eq!(assign_groups(&["", "", "核桃"], 80.0), [0, 1, 2]);
    }

    #[test]
    fn test_reanalysis_is_byte_identical() {
        let analyzer = Analyzer::default();
        let first = serde_json::to_string(&analyzer.analyze_at(batch(sample()), now())).unwrap();
        let second = serde_json::to_string(&analyzer.analyze_at(batch(sample()), now())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_columns_and_pass_through() {
        let input = json!([{
            "url": "https://a.com/goods/1",
            "title": "核桃",
            "description": "新疆核桃",
            "scrape_time": "2025-09-05T08:00:00Z",
            "campaign": "autumn",
            "score": 9999,
            "kw_stale": 1
        }]);
        let out = Analyzer::default().analyze_at(batch(input), now());
        let json = serde_json::to_value(&out).unwrap();
        let row = json[0].as_object().unwrap();

        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert!(keys.contains(&"campaign"));
        assert!(!keys.contains(&"kw_stale"));
        assert_eq!(row["campaign"], "autumn");
        assert_eq!(row["kw_核桃"], 1);
        assert_eq!(row["kw_产地"], 0);
        assert_eq!(row["kw_新疆"], 1);
        assert_eq!(row["kw_手剥"], 0);
        assert_eq!(row["desc_len"], 4);
        assert_eq!(row["comp_group"], 0);
        assert_eq!(row["score"], 4 + 100 + 200);
        assert_eq!(row["origin"], "新疆");
        assert_eq!(row["scrape_time"], "2025-09-05T08:00:00.000000Z");

        // feeding the output back in recomputes rather than duplicates
        let again = Analyzer::default().analyze_at(parse_batch(&json.to_string(), now()).unwrap(), now());
        assert_eq!(again[0].score, out[0].score);
        assert_eq!(again[0].extra.len(), 1);
    }

    #[test]
    fn test_origin_stats_counts_descending() {
        let input = json!([
            {"url": "https://a.com/1", "origin": "云南"},
            {"url": "https://a.com/2", "origin": "新疆"},
            {"url": "https://a.com/3", "origin": "新疆"},
            {"url": "https://a.com/4", "origin": "山东"}
        ]);
        let out = Analyzer::default().analyze_at(batch(input), now());
        let stats = origin_stats(&out);
        assert_eq!(
            stats,
            vec![
                OriginStat { origin: "新疆".into(), count: 2 },
                OriginStat { origin: "云南".into(), count: 1 },
                OriginStat { origin: "山东".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_analyze_file_writes_ranked_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.json");
        let output = dir.path().join("out").join("analysis.json");
        let fresh = json!([
            {"url": "https://a.com/goods/1", "title": "核桃", "description": "核桃", "scrape_time": format_timestamp(&Utc::now())},
            {"url": "https://a.com/goods/2", "title": "新疆手剥核桃", "description": "新疆手剥核桃", "scrape_time": format_timestamp(&Utc::now())},
            {"url": "https://a.com/goods/3", "title": "核桃", "description": "核桃", "scrape_time": "2001-01-01T00:00:00Z"}
        ]);
        std::fs::write(&input, fresh.to_string()).unwrap();

        let report = Analyzer::default().analyze_file(&input, &output).unwrap();
        assert_eq!(report.loaded, 3);
        assert_eq!(report.kept, 2);
        assert_eq!(report.top_score, Some(6 + 150 + 200));

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written[0]["url"], "https://a.com/goods/2");
        assert_eq!(written.as_array().unwrap().len(), 2);
    }
}
