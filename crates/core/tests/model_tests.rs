// ═══════════════════════════════════════════════════════════════════
// Model Tests: wire formats, form validation, view models, config
// ═══════════════════════════════════════════════════════════════════

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::json;

use trade_dashboard_core::config::DashboardConfig;
use trade_dashboard_core::errors::CoreError;
use trade_dashboard_core::models::chart::ValueSample;
use trade_dashboard_core::models::market::MarketPrice;
use trade_dashboard_core::models::model::{Model, NewModelForm};
use trade_dashboard_core::models::portfolio::{PortfolioSnapshot, Position, Side};
use trade_dashboard_core::models::timestamp::{format_in_zone, parse_timestamp};
use trade_dashboard_core::models::trade::{Conversation, Signal, Trade};
use trade_dashboard_core::models::view::{
    format_money, format_signed, model_rows, position_rows, price_tiles, trade_rows, ListView,
    StatsView, Trend, EMPTY_POSITIONS, EMPTY_TRADES,
};

// ═══════════════════════════════════════════════════════════════════
// Timestamps
// ═══════════════════════════════════════════════════════════════════

mod timestamps {
    use super::*;

    #[test]
    fn naive_space_separated_is_utc() {
        let ts = parse_timestamp("2024-05-01 12:30:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn fractional_seconds_and_t_separator() {
        assert!(parse_timestamp("2024-05-01 12:30:00.123456").is_some());
        assert!(parse_timestamp("2024-05-01T12:30:00").is_some());
    }

    #[test]
    fn explicit_offset_is_honoured() {
        let ts = parse_timestamp("2024-05-01T20:30:00+08:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(serde_json::from_value::<ValueSample>(
            json!({"timestamp": "soon", "total_value": 1.0})
        )
        .is_err());
    }

    #[test]
    fn display_converts_to_zone() {
        let ts = parse_timestamp("2024-05-01 12:30:00").unwrap();
        let zone: Tz = "Asia/Shanghai".parse().unwrap();
        assert_eq!(format_in_zone(&ts, zone), "2024-05-01 20:30:00");
    }

    #[test]
    fn value_sample_serializes_in_backend_format() {
        let sample = ValueSample {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            total_value: 10.0,
        };
        let value = serde_json::to_value(&sample).unwrap();
        assert_eq!(value["timestamp"], json!("2024-05-01 12:00:00"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Wire types
// ═══════════════════════════════════════════════════════════════════

mod wire {
    use super::*;

    #[test]
    fn model_ignores_secret_fields() {
        let model: Model = serde_json::from_value(json!({
            "id": 3, "name": "A", "model_name": "gpt-4o",
            "api_key": "sk-secret", "api_url": "https://x", "created_at": "2024-05-01 00:00:00"
        }))
        .unwrap();
        assert_eq!(model.id, 3);
        assert!(!model.engine_active);
        assert_eq!(model.initial_capital, None);
    }

    #[test]
    fn known_signals_map_to_variants() {
        let parse = |s: &str| serde_json::from_value::<Signal>(json!(s)).unwrap();
        assert_eq!(parse("buy_to_enter"), Signal::BuyToEnter);
        assert_eq!(parse("sell_to_enter"), Signal::SellToEnter);
        assert_eq!(parse("close_position"), Signal::ClosePosition);
        assert_eq!(parse("hold"), Signal::Other("hold".into()));
    }

    #[test]
    fn signal_serializes_back_to_wire_string() {
        assert_eq!(serde_json::to_value(Signal::BuyToEnter).unwrap(), json!("buy_to_enter"));
        assert_eq!(serde_json::to_value(Signal::Other("hold".into())).unwrap(), json!("hold"));
    }

    #[test]
    fn signal_labels() {
        assert_eq!(Signal::BuyToEnter.label(), "Open long");
        assert_eq!(Signal::ClosePosition.label(), "Close");
        assert_eq!(Signal::Other("hold".into()).label(), "hold");
    }

    #[test]
    fn side_is_lowercase_on_the_wire() {
        assert_eq!(serde_json::from_value::<Side>(json!("short")).unwrap(), Side::Short);
        assert!(serde_json::from_value::<Side>(json!("Short")).is_err());
        assert_eq!(Side::Long.to_string(), "long");
    }

    #[test]
    fn trade_pnl_defaults_to_zero() {
        let trade: Trade = serde_json::from_value(json!({
            "timestamp": "2024-05-01 12:00:00", "coin": "BTC", "signal": "buy_to_enter",
            "quantity": 1, "price": 2
        }))
        .unwrap();
        assert_eq!(trade.pnl, 0.0);
    }

    #[test]
    fn conversation_optional_fields() {
        let c: Conversation = serde_json::from_value(json!({
            "timestamp": "2024-05-01 12:00:00", "ai_response": "hold", "cot_trace": "because"
        }))
        .unwrap();
        assert_eq!(c.user_prompt, None);
        assert_eq!(c.cot_trace.as_deref(), Some("because"));
    }

    #[test]
    fn market_price_change_defaults() {
        let p: MarketPrice = serde_json::from_value(json!({"price": 5})).unwrap();
        assert_eq!(p.change_24h, 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// NewModelForm
// ═══════════════════════════════════════════════════════════════════

mod form {
    use super::*;

    fn filled() -> NewModelForm {
        NewModelForm {
            name: " Alpha ".into(),
            api_key: "sk-1".into(),
            api_url: "https://llm.test".into(),
            model_name: "gpt-4o".into(),
            initial_capital: " 2500.5 ".into(),
        }
    }

    #[test]
    fn valid_form_is_trimmed_and_parsed() {
        let model = filled().validate().unwrap();
        assert_eq!(model.name, "Alpha");
        assert_eq!(model.initial_capital, 2500.5);
    }

    #[test]
    fn every_missing_field_is_named() {
        let err = NewModelForm::default().validate().unwrap_err();
        match err {
            CoreError::UserInput(msg) => {
                for field in ["name", "api_key", "api_url", "model_name", "initial_capital"] {
                    assert!(msg.contains(field), "{msg} should mention {field}");
                }
            }
            other => panic!("expected UserInput, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_capital_is_rejected() {
        let mut form = filled();
        form.initial_capital = "ten thousand".into();
        assert!(matches!(form.validate(), Err(CoreError::UserInput(_))));
    }

    #[test]
    fn infinite_capital_is_rejected() {
        let mut form = filled();
        form.initial_capital = "inf".into();
        assert!(form.validate().is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// View models
// ═══════════════════════════════════════════════════════════════════

mod views {
    use super::*;

    fn snapshot(total: f64, capital: Option<f64>) -> PortfolioSnapshot {
        PortfolioSnapshot {
            total_value: total,
            cash: 100.0,
            realized_pnl: 0.0,
            unrealized_pnl: -1.0,
            initial_capital: capital,
            positions: Vec::new(),
            positions_value: None,
            margin_used: None,
        }
    }

    #[test]
    fn trend_by_sign() {
        assert_eq!(Trend::of(0.01), Trend::Positive);
        assert_eq!(Trend::of(-0.01), Trend::Negative);
        assert_eq!(Trend::of(0.0), Trend::Neutral);
    }

    #[test]
    fn stats_return_needs_capital() {
        assert_eq!(StatsView::from_snapshot(&snapshot(110.0, None)).return_pct, None);
        let stats = StatsView::from_snapshot(&snapshot(110.0, Some(100.0)));
        let ret = stats.return_pct.unwrap();
        assert!((ret.value - 10.0).abs() < 1e-9);
        assert_eq!(ret.trend, Trend::Positive);
        assert_eq!(stats.realized_pnl.trend, Trend::Neutral);
        assert_eq!(stats.unrealized_pnl.trend, Trend::Negative);
    }

    #[test]
    fn money_rounds_only_for_display() {
        assert_eq!(format_money(1234.5678), "1234.57");
        assert_eq!(format_signed(3.0), "+3.00");
        assert_eq!(format_signed(-3.004), "-3.00");
        assert_eq!(format_signed(0.0), "0.00");
    }

    #[test]
    fn empty_lists_carry_messages() {
        assert_eq!(
            position_rows(&[]),
            ListView::Empty {
                message: EMPTY_POSITIONS.into()
            }
        );
        assert_eq!(
            trade_rows(&[], Tz::UTC),
            ListView::Empty {
                message: EMPTY_TRADES.into()
            }
        );
    }

    #[test]
    fn model_rows_mark_selection() {
        let models = vec![
            Model {
                id: 1,
                name: "A".into(),
                model_name: "m".into(),
                initial_capital: None,
                engine_active: false,
            },
            Model {
                id: 2,
                name: "B".into(),
                model_name: "m".into(),
                initial_capital: None,
                engine_active: true,
            },
        ];
        let rows = model_rows(&models, Some(2));
        let active: Vec<bool> = rows.items().iter().map(|r| r.active).collect();
        assert_eq!(active, vec![false, true]);
    }

    #[test]
    fn position_without_quote_shows_dash() {
        let rows = position_rows(&[Position {
            coin: "SOL".into(),
            side: Side::Short,
            quantity: 2.0,
            avg_price: 150.0,
            leverage: 3.0,
            current_price: None,
            pnl: None,
        }]);
        let row = &rows.items()[0];
        assert_eq!(row.current_price, "-");
        assert_eq!(row.leverage, "3x");
        assert!(row.pnl.is_none());
    }

    #[test]
    fn price_tiles_are_sorted_by_coin() {
        let mut prices = std::collections::BTreeMap::new();
        prices.insert("ETH".to_string(), MarketPrice { price: 3000.0, change_24h: -1.0 });
        prices.insert("BTC".to_string(), MarketPrice { price: 61000.0, change_24h: 2.0 });
        let tiles = price_tiles(&prices);
        let coins: Vec<&str> = tiles.items().iter().map(|t| t.coin.as_str()).collect();
        assert_eq!(coins, vec!["BTC", "ETH"]);
        assert_eq!(tiles.items()[1].change_24h.trend, Trend::Negative);
    }
}

// ═══════════════════════════════════════════════════════════════════
// DashboardConfig
// ═══════════════════════════════════════════════════════════════════

mod config {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = DashboardConfig::default();
        config.validate().unwrap();
        assert_eq!(config.trade_limit, 50);
        assert_eq!(config.conversation_limit, 20);
        assert_eq!(config.chart.grid_steps, 4);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = DashboardConfig {
            market_poll_secs: 0,
            ..DashboardConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn zero_request_timeout_is_rejected() {
        let config = DashboardConfig {
            request_timeout_secs: 0,
            ..DashboardConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let config = DashboardConfig {
            base_url: " ".into(),
            ..DashboardConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: DashboardConfig =
            serde_json::from_value(json!({"base_url": "http://h:1", "chart": {"grid_steps": 5}}))
                .unwrap();
        assert_eq!(config.base_url, "http://h:1");
        assert_eq!(config.model_poll_secs, 10);
        assert_eq!(config.chart.grid_steps, 5);
        assert_eq!(config.chart.time_labels, 4);
    }
}
