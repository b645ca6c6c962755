use chrono::NaiveDate;
use job_listings::{
    featured_jobs, ExperienceLevel, FilterFields, FilterPatch, Job, JobId, JobType,
    ListingEngine, LocationFilter, SortMode, View,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn job(id: JobId, title: &str, posted: &str) -> Job {
    Job::new(id, title, "Acme", JobType::Permanent, date(posted))
}

fn ids(engine: &ListingEngine) -> Vec<JobId> {
    engine.visible_items().iter().map(|x| x.id).collect()
}

fn all_ids(engine: &ListingEngine) -> Vec<JobId> {
    engine.all_items().map(|x| x.id).collect()
}

/// Ten jobs, four of them remote. Location strings are chosen so they can't be
/// used to tell which ones are remote.
fn ten_jobs() -> Vec<Job> {
    (1..=10)
        .map(|id| {
            let job = job(id, &format!("Job {id}"), "2024-08-20");
            match id {
                1 => job.with_remote(true),
                2 => job.with_remote(true).with_location("Austin, TX"),
                3 => job.with_remote(true).with_location("Boston, MA"),
                4 => job.with_remote(true).with_location("Hybrid"),
                5 => job.with_location("Remote-friendly HQ"),
                6 => job.with_location("Chicago, IL"),
                _ => job,
            }
        })
        .collect()
}

fn patches() -> Vec<FilterPatch> {
    vec![
        FilterPatch::new(),
        FilterPatch::new().keyword("officer"),
        FilterPatch::new().keyword("CFO"),
        FilterPatch::new().location(LocationFilter::Remote),
        FilterPatch::new().location(LocationFilter::Contains("new-york".to_string())),
        FilterPatch::new().job_type(Some(JobType::Temporary)),
        FilterPatch::new().remote_only(true).keyword("vp"),
        FilterPatch::new()
            .job_type(Some(JobType::Permanent))
            .location(LocationFilter::Contains("san-francisco".to_string())),
        FilterPatch::new().experience_level(Some(ExperienceLevel::Executive)),
        FilterPatch::new().keyword("no such job anywhere"),
    ]
}

#[test]
fn remote_only_uses_the_remote_flag() {
    let mut engine = ListingEngine::default().with_jobs(ten_jobs());
    engine.set_filter(FilterPatch::new().remote_only(true));
    assert_eq!(engine.total_count(), 4);
    assert_eq!(ids(&engine), [1, 2, 3, 4]);
}

#[test]
fn equal_dates_keep_input_order() {
    let jobs = vec![
        job(1, "A", "2024-08-20"),
        job(2, "B", "2024-08-21"),
        job(3, "C", "2024-08-20"),
    ];
    let mut engine = ListingEngine::default().with_jobs(jobs);
    assert_eq!(ids(&engine), [2, 1, 3]);
    engine.set_sort(SortMode::Oldest);
    assert_eq!(ids(&engine), [1, 3, 2]);
}

#[test]
fn load_more_reveals_the_rest() {
    let mut engine = ListingEngine::new(FilterFields::PUBLIC, 8).with_jobs(featured_jobs().unwrap());
    assert_eq!(engine.total_count(), 15);
    assert_eq!(engine.visible_items().len(), 8);
    assert!(engine.has_more());

    assert!(engine.load_more());
    assert_eq!(engine.visible_items().len(), 15);
    assert!(!engine.has_more());
    assert!(!engine.load_more());
    assert_eq!(engine.current_page(), 2);
}

#[test]
fn keyword_matches_tags() {
    let cfo = job(1, "Fractional Chief Financial Officer", "2024-08-25")
        .with_description("Oversee financial operations and fundraising.")
        .with_tags(["CFO", "Fundraising"]);
    let cmo = job(2, "Fractional Chief Marketing Officer", "2024-08-27");
    assert!(!cfo.title.to_lowercase().contains("cfo"));

    let mut engine = ListingEngine::default().with_jobs(vec![cfo, cmo]);
    engine.set_filter(FilterPatch::new().keyword("cfo"));
    assert_eq!(ids(&engine), [1]);
}

#[test]
fn empty_result_is_no_results() {
    let mut engine = ListingEngine::default().with_jobs(featured_jobs().unwrap());
    engine.set_filter(FilterPatch::new().keyword("underwater basket weaving"));
    assert_eq!(engine.total_count(), 0);
    assert_eq!(engine.view(), View::NoResults);
    assert!(!engine.has_more());
}

#[test]
fn results_are_a_matching_subset() {
    let jobs = featured_jobs().unwrap();
    for patch in patches() {
        let mut engine = ListingEngine::default().with_jobs(jobs.clone());
        engine.set_filter(patch.clone());
        for item in engine.all_items() {
            assert!(jobs.contains(item), "{:?}", patch);
            assert!(engine.filter().matches(item), "{:?}", patch);
        }
        let expected = jobs.iter().filter(|x| engine.filter().matches(x)).count();
        assert_eq!(engine.total_count(), expected, "{:?}", patch);
    }
}

#[test]
fn filtering_is_idempotent() {
    for patch in patches() {
        let mut engine = ListingEngine::default().with_jobs(featured_jobs().unwrap());
        engine.set_filter(patch.clone());
        let once = all_ids(&engine);
        engine.set_filter(patch.clone());
        assert_eq!(all_ids(&engine), once, "{:?}", patch);
    }
}

#[test]
fn sorting_keeps_membership() {
    for patch in patches() {
        let mut engine = ListingEngine::default().with_jobs(featured_jobs().unwrap());
        engine.set_filter(patch.clone());
        let mut expected = all_ids(&engine);
        expected.sort();
        for mode in SortMode::ALL {
            engine.set_sort(mode);
            let mut actual = all_ids(&engine);
            actual.sort();
            assert_eq!(actual, expected, "{:?} {}", patch, mode);
        }
    }
}

#[test]
fn page_resets_and_slice_length() {
    let mut engine = ListingEngine::new(FilterFields::PUBLIC, 4).with_jobs(featured_jobs().unwrap());
    let check = |engine: &ListingEngine| {
        let expected = (engine.current_page() * engine.page_size()).min(engine.total_count());
        assert_eq!(engine.visible_items().len(), expected);
    };

    check(&engine);
    engine.load_more();
    engine.load_more();
    assert_eq!(engine.current_page(), 3);
    check(&engine);

    engine.set_sort(SortMode::SalaryLow);
    assert_eq!(engine.current_page(), 1);
    check(&engine);

    engine.load_more();
    engine.set_filter(FilterPatch::new().location(LocationFilter::Remote));
    assert_eq!(engine.current_page(), 1);
    check(&engine);

    engine.load_more();
    engine.clear_filter();
    assert_eq!(engine.current_page(), 1);
    assert_eq!(engine.total_count(), 15);
    check(&engine);
}
