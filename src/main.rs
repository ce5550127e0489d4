use std::{env, time::Instant};

use anime_recommender::{
    Catalog, ItemView, LoadReport, MatchMode, QueryLog, Recommendation, Recommender,
    RecommenderConfig,
};

fn main() {
    let program_start = Instant::now();
    // ---- 簡易 CLI 引数処理 ----
    // --data PATH      : カタログCSV (デフォ: anime.csv)
    // --title "NAME"   : 1回だけ推薦して終了 (未指定なら対話ループ)
    // --count N        : 推薦件数 (デフォ: 5)
    // --normalized     : タイトル照合を大文字小文字無視にする
    // --rerank N       : N件の近傍プールを評価値降順で並べ替えてから返す
    // --top-rated N    : 評価値上位N件を表示して終了
    // --json           : 結果をJSONで出力 (--title / --top-rated 時のみ)
    // 例)  anime-recommender --data anime.csv --title "Naruto"
    //      anime-recommender --normalized --rerank 9 --count 3

    let mut args = env::args().skip(1); // program 名除外
    let mut data_path = String::from("anime.csv");
    let mut title_opt: Option<String> = None;
    let mut count = 5usize;
    let mut normalized = false;
    let mut rerank_opt: Option<usize> = None;
    let mut top_rated_opt: Option<usize> = None;
    let mut json = false;
    while let Some(a) = args.next() {
        match a.as_str() {
            "--data" => {
                if let Some(v) = args.next() { data_path = v; } else { eprintln!("[error] --data requires a path"); return; }
            }
            "--title" => {
                if let Some(v) = args.next() { title_opt = Some(v); } else { eprintln!("[error] --title requires a string"); return; }
            }
            "--count" => {
                if let Some(v) = args.next() { match v.parse::<usize>() { Ok(n) if n > 0 => count = n, _ => { eprintln!("[error] --count needs positive integer"); return; } } } else { eprintln!("[error] --count requires a number"); return; }
            }
            "--normalized" => { normalized = true; }
            "--rerank" => {
                if let Some(v) = args.next() { match v.parse::<usize>() { Ok(n) if n > 0 => rerank_opt = Some(n), _ => { eprintln!("[error] --rerank needs positive integer"); return; } } } else { eprintln!("[error] --rerank requires a number"); return; }
            }
            "--top-rated" => {
                if let Some(v) = args.next() { match v.parse::<usize>() { Ok(n) if n > 0 => top_rated_opt = Some(n), _ => { eprintln!("[error] --top-rated needs positive integer"); return; } } } else { eprintln!("[error] --top-rated requires a number"); return; }
            }
            "--json" => { json = true; }
            "-h" | "--help" => {
                print_usage();
                return;
            }
            other => {
                // 位置引数をタイトルとして解釈 (最初のみ)
                if title_opt.is_none() { title_opt = Some(other.to_string()); } else { eprintln!("[warn] extra arg ignored: {}", other); }
            }
        }
    }

    // ---- カタログロード ----
    let load_start = Instant::now();
    let (catalog, report) = match Catalog::from_csv_path(&data_path) {
        Ok(v) => v,
        Err(e) => { eprintln!("[error] failed to load catalog: {}", e); return; }
    };
    report_load_warnings(&report);
    eprintln!("[info] loaded {} items from {} ({} rows read, {} dropped)",
        catalog.len(), data_path, report.rows_read, report.rows_dropped);
    if catalog.is_empty() {
        eprintln!("[error] no items loaded. abort");
        return;
    }

    // ---- インデックスビルド (1回だけ) ----
    let fit_start = Instant::now();
    let config = RecommenderConfig {
        match_mode: if normalized { MatchMode::Normalized } else { MatchMode::Exact },
        rerank_pool: rerank_opt,
    };
    let rec = Recommender::with_config(catalog, config);
    let built = Instant::now();
    eprintln!("[info] vocabulary: {} terms over {} items",
        rec.index().vocab_len(), rec.index().doc_count());
    if rec.index().is_vocab_empty() {
        eprintln!("[warn] genre vocabulary is empty; every recommendation will be empty");
    }
    eprintln!("[time] load={:.2}ms fit={:.2}ms total={:.2}ms",
        fit_start.duration_since(load_start).as_secs_f64() * 1000.0,
        built.duration_since(fit_start).as_secs_f64() * 1000.0,
        built.duration_since(load_start).as_secs_f64() * 1000.0);

    // ---- モード判定: --top-rated / --title はその1回だけ、未指定なら対話ループ ----
    if let Some(n) = top_rated_opt {
        print_results(&rec.top_rated(n), json);
    } else if let Some(title) = title_opt {
        run_single_query(&rec, &title, count, json);
    } else {
        run_interactive(&rec, count);
    }

    eprintln!("[time] program_total={:.2}ms", program_start.elapsed().as_secs_f64() * 1000.0);
}

fn print_usage() {
    eprintln!("Usage: anime-recommender [--data PATH] [--title \"NAME\"] [--count N] [--normalized] [--rerank N] [--top-rated N] [--json]");
    eprintln!("If --title omitted, an interactive loop starts (commands: <title>, top, history, exit).");
    eprintln!("Output format: <rating>\t<name>\t<genre>");
}

fn report_load_warnings(report: &LoadReport) {
    if report.rows_dropped > 0 {
        eprintln!("[warn] dropped {} incomplete rows", report.rows_dropped);
    }
    for name in &report.duplicate_names {
        eprintln!("[warn] duplicate name: {} (first occurrence wins)", name);
    }
}

fn print_results(views: &[ItemView], json: bool) {
    if json {
        match serde_json::to_string_pretty(views) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("[error] json encode failed: {}", e),
        }
        return;
    }
    if views.is_empty() {
        println!("(no results)");
        return;
    }
    for v in views.iter() {
        println!("{:.2}\t{}\t{}", v.rating, v.name, v.genre);
    }
}

fn run_single_query(rec: &Recommender, title: &str, count: usize, json: bool) {
    let t0 = Instant::now();
    match rec.recommend(title, count) {
        Ok(results) => {
            eprintln!("[time] search={:.2}ms", t0.elapsed().as_secs_f64() * 1000.0);
            if json {
                let record = Recommendation { query: title.to_string(), results };
                match serde_json::to_string_pretty(&record) {
                    Ok(s) => println!("{}", s),
                    Err(e) => eprintln!("[error] json encode failed: {}", e),
                }
            } else {
                print_results(&results, false);
            }
        }
        Err(e) => eprintln!("[error] {}", e),
    }
}

fn run_interactive(rec: &Recommender, count: usize) {
    use std::io::{self, Write};
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut log = QueryLog::new();
    eprintln!("[info] commands: <title> / top / history / exit");
    loop {
        print!("Query> ");
        let _ = stdout.flush();
        let mut line = String::new();
        if stdin.read_line(&mut line).is_err() { eprintln!("[error] read error"); break; }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            eprintln!("[info] bye");
            break;
        }
        if trimmed.eq_ignore_ascii_case("top") {
            print_results(&rec.top_rated(10), false);
            continue;
        }
        if trimmed.eq_ignore_ascii_case("history") {
            if log.is_empty() { println!("(no history)"); continue; }
            for (i, entry) in log.iter().enumerate() {
                let names: Vec<&str> = entry.results.iter().map(|v| v.name.as_str()).collect();
                println!("{}\t{}\t[{}]", i + 1, entry.query, names.join(", "));
            }
            continue;
        }
        let start = Instant::now();
        match rec.recommend(trimmed, count) {
            Ok(results) => {
                eprintln!("[time] search={:.2}ms", start.elapsed().as_secs_f64() * 1000.0);
                print_results(&results, false);
                log.record(Recommendation { query: trimmed.to_string(), results });
            }
            Err(e) => eprintln!("[error] {}", e),
        }
    }
}
