//! Conversion graph over asset symbols.
//!
//! Nodes are symbols, and an undirected edge of weight one joins two symbols
//! whenever a tradable ticker connects them. The graph is used for
//! reachability only; prices never enter it.

pub mod core;
pub mod types;

pub use self::core::ConversionGraph;
pub use types::{
    ConversionEdge, RejectedTicker, Symbol, SymbolId, SymbolNode, TickerPolicy, TickerResolution,
    HOP_WEIGHT,
};

#[cfg(test)]
mod tests {
    use super::*;

    const SYMBOLS: [&str; 8] = ["USD", "USDC", "USDT", "XBT", "XDG", "ETH", "SOL", "LTC"];

    #[test]
    fn test_build_single_pair() {
        let graph = ConversionGraph::build(&["XBTUSD"], &["USD", "XBT"]).unwrap();

        assert_eq!(graph.symbol_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors("USD"), vec!["XBT"]);
        assert_eq!(graph.neighbors("XBT"), vec!["USD"]);
        assert_eq!(graph.edge_weight("USD", "XBT"), Some(HOP_WEIGHT));
        assert_eq!(graph.ticker_between("XBT", "USD"), Some("XBTUSD"));
    }

    #[test]
    fn test_edges_are_symmetric() {
        let tickers = ["ETHUSD", "ETHXBT", "SOLETH"];
        let graph = ConversionGraph::build(&tickers, &["USD", "ETH", "XBT", "SOL"]).unwrap();

        for edge in graph.edges() {
            let [a, b] = edge.symbols();
            let a = graph.get_symbol(a).unwrap().symbol();
            let b = graph.get_symbol(b).unwrap().symbol();
            assert!(graph.neighbors(a).contains(&b));
            assert!(graph.neighbors(b).contains(&a));
            assert!(graph.are_adjacent(a, b) && graph.are_adjacent(b, a));
        }
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_tickers_not_matching_two_symbols_are_dropped() {
        // USDCUSDT contains USD, USDC and USDT; DOGEEUR matches nothing; XBT alone matches one
        let tickers = ["USDCUSDT", "DOGEEUR", "XBT", "SOLUSD"];
        let graph = ConversionGraph::build(&tickers, &SYMBOLS).unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.are_adjacent("SOL", "USD"));
        assert!(!graph.are_adjacent("USDC", "USDT"));
        assert_eq!(graph.tradable_tickers(), &["SOLUSD".to_string()]);

        let rejected: Vec<_> = graph.rejected_tickers().iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(rejected, vec!["USDCUSDT", "DOGEEUR", "XBT"]);
        assert_eq!(
            graph.rejected_tickers()[0].matched,
            vec!["USD".to_string(), "USDC".to_string(), "USDT".to_string()]
        );
    }

    #[test]
    fn test_default_listing_keeps_only_unambiguous_tickers() {
        let tickers = [
            "ETHUSDC", "ETHUSDT", "LTCETH", "LTCUSDT", "SOLETH", "SOLUSD", "SOLUSDT", "SOLXBT",
            "USDCUSD", "USDCUSDT", "XBTUSDC", "XBTUSDT", "XDGUSD", "XDGUSDT",
        ];
        let graph = ConversionGraph::build(&tickers, &SYMBOLS).unwrap();

        assert_eq!(
            graph.tradable_tickers(),
            &["LTCETH", "SOLETH", "SOLUSD", "SOLXBT", "USDCUSD", "XDGUSD"]
        );
        assert_eq!(graph.edge_count(), 6);
        assert!(graph.neighbors("USDT").is_empty());
    }

    #[test]
    fn test_exact_split_policy_resolves_nested_symbols() {
        let tickers = ["ETHUSDC", "USDCUSDT", "XBTUSD", "ETHFOO"];
        let graph =
            ConversionGraph::build_with_policy(&tickers, &SYMBOLS, TickerPolicy::ExactSplit).unwrap();

        assert!(graph.are_adjacent("ETH", "USDC"));
        assert!(graph.are_adjacent("USDC", "USDT"));
        assert!(graph.are_adjacent("XBT", "USD"));
        assert!(!graph.are_adjacent("ETH", "USD"));
        assert_eq!(graph.rejected_tickers().len(), 1);
        assert_eq!(graph.rejected_tickers()[0].ticker, "ETHFOO");
    }

    #[test]
    fn test_exact_split_rejects_ambiguous_split() {
        // "ABC" splits as A+BC and AB+C
        let resolution =
            ConversionGraph::resolve_ticker("ABC", &["A", "BC", "AB", "C"], TickerPolicy::ExactSplit);
        assert!(matches!(resolution, TickerResolution::Rejected { .. }));
    }

    #[test]
    fn test_strict_policy_fails_on_ambiguous_ticker() {
        let result =
            ConversionGraph::build_with_policy(&["XBTUSD", "USDCUSDT"], &SYMBOLS, TickerPolicy::Strict);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("USDCUSDT"));
    }

    #[test]
    fn test_duplicate_ticker_is_idempotent() {
        let graph = ConversionGraph::build(&["XBTUSD", "USDXBT", "XBTUSD"], &["USD", "XBT"]).unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors("USD"), vec!["XBT"]);
        assert_eq!(graph.ticker_between("USD", "XBT"), Some("XBTUSD"));
    }

    #[test]
    fn test_neighbors_of_unknown_or_isolated_symbol_are_empty() {
        let graph = ConversionGraph::build(&["XBTUSD"], &["USD", "XBT", "SOL"]).unwrap();

        assert!(graph.contains("SOL"));
        assert!(graph.neighbors("SOL").is_empty());
        assert!(!graph.contains("DOGE"));
        assert!(graph.neighbors("DOGE").is_empty());
        assert!(graph.find_symbol_id("DOGE").is_err());
    }

    #[test]
    fn test_neighbor_order_follows_ticker_order() {
        let tickers = ["SOLUSD", "XBTUSD", "ETHUSD"];
        let graph = ConversionGraph::build(&tickers, &["USD", "SOL", "XBT", "ETH"]).unwrap();

        assert_eq!(graph.neighbors("USD"), vec!["SOL", "XBT", "ETH"]);
    }

    #[test]
    fn test_invalid_symbols_rejected() {
        assert!(ConversionGraph::build(&["XBTUSD"], &[] as &[&str]).is_err());
        assert!(ConversionGraph::build(&["XBTUSD"], &["usd", "XBT"]).is_err());
        assert!(ConversionGraph::build(&["XBTUSD"], &["", "XBT"]).is_err());
    }

    #[test]
    fn test_ticker_policy_parsing() {
        assert_eq!("substring".parse::<TickerPolicy>().unwrap(), TickerPolicy::Substring);
        assert_eq!("EXACT-SPLIT".parse::<TickerPolicy>().unwrap(), TickerPolicy::ExactSplit);
        assert_eq!("strict".parse::<TickerPolicy>().unwrap(), TickerPolicy::Strict);
        assert!("fuzzy".parse::<TickerPolicy>().is_err());
        assert_eq!(TickerPolicy::default(), TickerPolicy::Substring);
    }
}
