//! Integration tests for the standings import service: idempotence,
//! in-place stat updates, and cross-division identity reuse.

use teamtrack::config::{Config, DatabaseConfig};
use teamtrack::database::Database;
use teamtrack::ingest::StandingsImportService;
use teamtrack::models::{
    DivisionStandings, SeasonContext, SeasonType, TeamSeasonStats, TeamStandingRow,
};
use teamtrack::repositories::{SeasonRepository, TeamRepository, TeamSeasonRepository};
use teamtrack::resolver::IdentityResolver;

async fn test_database() -> Database {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
    };
    let database = Database::new(&config).await.unwrap();
    database.migrate().await.unwrap();
    database
}

fn import_service(database: &Database) -> StandingsImportService {
    let resolver =
        IdentityResolver::new(database.clone(), Config::default().matching).unwrap();
    StandingsImportService::new(database.clone(), resolver, 4)
}

fn stats(wins: i32, losses: i32, goals_for: i32, goals_against: i32) -> TeamSeasonStats {
    TeamSeasonStats {
        wins,
        losses,
        ties: 0,
        forfeits: 0,
        points: wins * 3,
        goals_for,
        goals_against,
        goal_differential: goals_for - goals_against,
    }
}

fn division(
    division_id: &str,
    division_name: &str,
    year: i32,
    season_type: SeasonType,
    rows: Vec<(&str, TeamSeasonStats)>,
) -> DivisionStandings {
    DivisionStandings {
        season: SeasonContext {
            year,
            season_type,
            season_name: format!("{} {}", season_type.as_str(), year),
        },
        division_id: division_id.to_string(),
        division_name: division_name.to_string(),
        teams: rows
            .into_iter()
            .map(|(name, stats)| TeamStandingRow {
                team_name: name.to_string(),
                stats,
            })
            .collect(),
    }
}

#[tokio::test]
async fn test_repeated_import_is_idempotent() {
    let database = test_database().await;
    let service = import_service(&database);

    let payload = division(
        "1042",
        "U10 Boys Gold",
        2022,
        SeasonType::Fall,
        vec![
            ("NUSC 2013B Green", stats(5, 1, 20, 8)),
            ("Rapids FC '13B", stats(4, 2, 15, 10)),
        ],
    );

    let first = service.import_division(payload.clone()).await.unwrap();
    assert_eq!(first.divisions, 1);
    assert_eq!(first.team_seasons, 2);
    assert_eq!(first.teams_created, 2);
    assert_eq!(first.teams_matched, 0);

    let second = service.import_division(payload).await.unwrap();
    assert_eq!(second.teams_created, 0);
    assert_eq!(second.teams_matched, 2);

    let mut conn = database.pool().acquire().await.unwrap();
    assert_eq!(TeamRepository::count(&mut conn).await.unwrap(), 2);
    assert_eq!(TeamSeasonRepository::count(&mut conn).await.unwrap(), 2);
    assert_eq!(SeasonRepository::count_seasons(&mut conn).await.unwrap(), 1);
    assert_eq!(SeasonRepository::count_divisions(&mut conn).await.unwrap(), 1);
}

#[tokio::test]
async fn test_reimport_updates_stats_in_place() {
    let database = test_database().await;
    let service = import_service(&database);

    let early = division(
        "1042",
        "U10 Boys Gold",
        2022,
        SeasonType::Fall,
        vec![("NUSC 2013B Green", stats(3, 1, 12, 6))],
    );
    service.import_division(early).await.unwrap();

    // Same division later in the season: the existing row is updated,
    // not duplicated
    let late = division(
        "1042",
        "U10 Boys Gold",
        2022,
        SeasonType::Fall,
        vec![("NUSC 2013B Green", stats(7, 2, 28, 11))],
    );
    service.import_division(late).await.unwrap();

    let mut conn = database.pool().acquire().await.unwrap();
    let team = TeamRepository::find_by_canonical_name(&mut conn, "nusc 2013b green")
        .await
        .unwrap()
        .unwrap();

    let season = SeasonRepository::get_or_create_season(
        &mut conn,
        2022,
        SeasonType::Fall,
        "Fall 2022",
    )
    .await
    .unwrap();
    let div = SeasonRepository::get_or_create_division(
        &mut conn,
        "1042",
        "U10 Boys Gold",
        season.id,
    )
    .await
    .unwrap();

    let row = TeamSeasonRepository::find_by_team_and_division(&mut conn, team.id, div.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.stats.wins, 7);
    assert_eq!(row.stats.goal_differential, 17);
    assert_eq!(TeamSeasonRepository::count(&mut conn).await.unwrap(), 1);
}

#[tokio::test]
async fn test_same_team_across_seasons_resolves_to_one_identity() {
    let database = test_database().await;
    let service = import_service(&database);

    let fall = division(
        "1042",
        "U10 Boys Gold",
        2022,
        SeasonType::Fall,
        vec![("NUSC 2013B Green", stats(5, 1, 20, 8))],
    );
    let spring = division(
        "2077",
        "U10 Boys Gold",
        2023,
        SeasonType::Spring,
        vec![("NUSC 2013B Green", stats(6, 0, 24, 5))],
    );

    service.import_division(fall).await.unwrap();
    let outcome = service.import_division(spring).await.unwrap();
    assert_eq!(outcome.teams_matched, 1);
    assert_eq!(outcome.teams_created, 0);

    let mut conn = database.pool().acquire().await.unwrap();
    assert_eq!(TeamRepository::count(&mut conn).await.unwrap(), 1);

    let team = TeamRepository::find_by_canonical_name(&mut conn, "nusc 2013b green")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        TeamSeasonRepository::count_for_team(&mut conn, team.id)
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn test_import_all_fans_out_without_duplicating_identities() {
    let database = test_database().await;
    let service = import_service(&database);

    // The same team appears in several payloads processed concurrently;
    // the resolve lock must keep them from racing into duplicate rows
    let payloads = vec![
        division(
            "1001",
            "U10 Boys Gold",
            2022,
            SeasonType::Fall,
            vec![
                ("NUSC 2013B Green", stats(5, 1, 20, 8)),
                ("Rapids FC '13B", stats(4, 2, 15, 10)),
            ],
        ),
        division(
            "1002",
            "U10 Boys Silver",
            2022,
            SeasonType::Fall,
            vec![("Kalamazoo Kingdom 2013B", stats(2, 4, 9, 14))],
        ),
        division(
            "2001",
            "U11 Boys Gold",
            2023,
            SeasonType::Fall,
            vec![
                ("NUSC 2013B Green", stats(3, 3, 14, 14)),
                ("Rapids FC '13B", stats(6, 0, 22, 4)),
            ],
        ),
    ];

    let summary = service.import_all(payloads).await.unwrap();
    assert_eq!(summary.divisions, 3);
    assert_eq!(summary.team_seasons, 5);
    assert_eq!(summary.teams_created + summary.teams_matched, 5);
    assert_eq!(summary.teams_created, 3);

    let mut conn = database.pool().acquire().await.unwrap();
    assert_eq!(TeamRepository::count(&mut conn).await.unwrap(), 3);
    assert_eq!(TeamSeasonRepository::count(&mut conn).await.unwrap(), 5);
    assert_eq!(SeasonRepository::count_seasons(&mut conn).await.unwrap(), 2);
    assert_eq!(SeasonRepository::count_divisions(&mut conn).await.unwrap(), 3);
}
