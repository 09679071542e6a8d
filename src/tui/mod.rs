pub mod style;
pub mod table;

use desidub::models::{
    AnimeInfo, Envelope, Home, Record, SearchPage, Source, WatchInfo,
};

use table::{
    build_episodes_table, build_listing_table, build_sources_table, failure, shorten, title,
};

/// Renders an envelope for the terminal
pub fn render(envelope: &Envelope<Record>) -> String {
    match &envelope.data {
        Some(Record::Home(home)) => render_home(home),
        Some(Record::Search(search)) => render_search(search),
        Some(Record::Info(info)) => render_info(info),
        Some(Record::Watch(watch)) => render_watch(watch),
        None => failure(
            envelope.status,
            envelope.message.as_deref().unwrap_or_default(),
        ),
    }
}

fn render_home(home: &Home) -> String {
    let mut out = vec![];

    let rows = home
        .spotlight
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let dub = if s.is_dub { "dub" } else { "" };
            vec![(i + 1).to_string(), s.title.clone(), s.id.clone(), dub.into()]
        })
        .collect();
    out.push(title("Spotlight"));
    out.push(build_listing_table(vec!["#", "Title", "Id", ""], rows));

    let rows = home
        .trending
        .iter()
        .map(|t| {
            let rank = t.rank.map(|r| r.to_string()).unwrap_or_default();
            vec![rank, t.title.clone(), t.id.clone()]
        })
        .collect();
    out.push(title("Trending"));
    out.push(build_listing_table(vec!["Rank", "Title", "Id"], rows));

    for section in &home.latest {
        let rows = section
            .items
            .iter()
            .map(|l| {
                let episode = l.latest_episode.map(|e| e.to_string()).unwrap_or_default();
                vec![episode, l.title.clone(), l.id.clone()]
            })
            .collect();
        out.push(title(&section.title));
        out.push(build_listing_table(vec!["Ep.", "Title", "Id"], rows));
    }

    out.join("\n")
}

fn render_search(search: &SearchPage) -> String {
    let rows = search
        .results
        .iter()
        .enumerate()
        .map(|(i, r)| vec![(i + 1).to_string(), r.title.clone(), r.id.clone()])
        .collect();

    let mut out = vec![
        title(&format!("Results (page {})", search.page)),
        build_listing_table(vec!["#", "Title", "Id"], rows),
    ];
    if search.has_next_page {
        out.push(format!("More results on page {}", search.page + 1));
    }

    out.join("\n")
}

fn render_info(info: &AnimeInfo) -> String {
    let rows = info
        .episodes
        .iter()
        .map(|e| {
            let id = e.id.clone().unwrap_or_default();
            vec![e.number.to_string(), e.title.clone(), id]
        })
        .collect();

    let mut out = vec![title(&info.title)];
    if !info.description.is_empty() {
        out.push(info.description.clone());
    }
    out.push(build_episodes_table(vec!["Ep.", "Title", "Id"], rows));

    out.join("\n")
}

fn render_watch(watch: &WatchInfo) -> String {
    let rows = watch
        .sources
        .iter()
        .map(|s| match s {
            Source::Iframe { url, name } => vec![name.clone(), url.clone()],
            Source::Encrypted { config, .. } => {
                vec!["Encrypted".into(), shorten(config.as_str())]
            }
        })
        .collect();

    [
        title(&watch.title),
        build_sources_table(vec!["Type", "Source"], rows),
    ]
    .join("\n")
}
