mod common;

use common::{TestDb, employer, vacancy};
use hhload::models::employer::EmployerRecord;
use hhload::models::vacancy::VacancyRecord;
use hhload::report;

async fn table_counts(pool: &sqlx::PgPool) -> (i64, i64) {
    let employers: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employers")
        .fetch_one(pool)
        .await
        .unwrap();
    (employers.0, VacancyRecord::count(pool).await.unwrap())
}

/// Salaries {0, 1000, 2000, 0, 3000} across two employers.
async fn load_salary_fixture(pool: &sqlx::PgPool) {
    let employers = vec![employer("1", "Точка", 3), employer("2", "Creonit", 2)];
    let vacancies = vec![
        vacancy("10", "Senior Python Developer", "Точка", 0),
        vacancy("11", "PYTHON analyst", "Точка", 1000),
        vacancy("12", "Java Engineer", "Точка", 2000),
        vacancy("20", "Менеджер проектов", "Creonit", 0),
        vacancy("21", "Team Lead", "Creonit", 3000),
    ];
    assert_eq!(EmployerRecord::insert_all(pool, &employers).await.unwrap(), 2);
    assert_eq!(VacancyRecord::insert_all(pool, &vacancies).await.unwrap(), 5);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn reset_twice_leaves_empty_tables() {
    let harness = TestDb::start().await.unwrap();

    let pool = harness.fresh_pool().await.unwrap();
    assert_eq!(table_counts(&pool).await, (0, 0));
    load_salary_fixture(&pool).await;
    assert_eq!(table_counts(&pool).await, (2, 5));
    pool.close().await;

    let pool = harness.fresh_pool().await.unwrap();
    assert_eq!(table_counts(&pool).await, (0, 0));
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn reset_terminates_open_sessions() {
    let harness = TestDb::start().await.unwrap();
    let stale = harness.fresh_pool().await.unwrap();
    load_salary_fixture(&stale).await;

    // The stale pool still holds a connection to the old database.
    let pool = harness.fresh_pool().await.unwrap();
    assert_eq!(table_counts(&pool).await, (0, 0));
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn average_excludes_unknown_salaries() {
    let harness = TestDb::start().await.unwrap();
    let pool = harness.fresh_pool().await.unwrap();
    load_salary_fixture(&pool).await;

    assert_eq!(report::average_salary(&pool).await.unwrap(), Some(2000.0));
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn average_is_none_without_known_salaries() {
    let harness = TestDb::start().await.unwrap();
    let pool = harness.fresh_pool().await.unwrap();
    EmployerRecord::insert_all(&pool, &[employer("1", "Точка", 1)])
        .await
        .unwrap();
    VacancyRecord::insert_all(&pool, &[vacancy("1", "Стажёр", "Точка", 0)])
        .await
        .unwrap();

    assert_eq!(report::average_salary(&pool).await.unwrap(), None);
    assert!(report::vacancies_above_average(&pool).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn above_average_returns_only_higher_salaries() {
    let harness = TestDb::start().await.unwrap();
    let pool = harness.fresh_pool().await.unwrap();
    load_salary_fixture(&pool).await;

    let above = report::vacancies_above_average(&pool).await.unwrap();
    assert_eq!(
        above,
        vec![report::VacancySalary {
            vacancy_name: "Team Lead".to_string(),
            vacancy_salary_from: 3000,
        }]
    );
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn keyword_search_ignores_case() {
    let harness = TestDb::start().await.unwrap();
    let pool = harness.fresh_pool().await.unwrap();
    load_salary_fixture(&pool).await;

    let matched = report::vacancies_by_keyword(&pool, "python").await.unwrap();
    let names: Vec<_> = matched.iter().map(|v| v.vacancy_name.as_str()).collect();
    assert_eq!(names, vec!["PYTHON analyst", "Senior Python Developer"]);
    assert_eq!(matched[0].vacancy_employer, "Точка");
    assert_eq!(matched[0].vacancy_salary_from, 1000);

    assert!(report::vacancies_by_keyword(&pool, "py%on").await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn companies_report_counts_loaded_vacancies() {
    let harness = TestDb::start().await.unwrap();
    let pool = harness.fresh_pool().await.unwrap();
    load_salary_fixture(&pool).await;
    EmployerRecord::insert_all(&pool, &[employer("3", "Генотек", 4)])
        .await
        .unwrap();

    let counts = report::companies_and_vacancy_counts(&pool).await.unwrap();
    let summary: Vec<_> = counts
        .iter()
        .map(|c| (c.employer_open_vacancies, c.loaded_vacancies))
        .collect();
    assert_eq!(counts.len(), 3);
    assert!(summary.contains(&(3, 3)));
    assert!(summary.contains(&(2, 2)));
    assert!(summary.contains(&(4, 0)));

    let all = report::all_vacancies(&pool).await.unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.iter().any(|v| v.vacancy_url == "https://hh.ru/vacancy/21"));

    let rendered = report::render_all(&pool, "python").await.unwrap();
    assert!(rendered.contains("== Average salary ==\n2000.00"));
    assert!(rendered.contains("== Vacancies matching 'python' (2) =="));
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn vacancy_for_unknown_employer_is_rejected() {
    let harness = TestDb::start().await.unwrap();
    let pool = harness.fresh_pool().await.unwrap();
    EmployerRecord::insert_all(&pool, &[employer("1", "Точка", 1)])
        .await
        .unwrap();

    let err = VacancyRecord::insert_all(&pool, &[vacancy("1", "Python dev", "Нет такой", 0)])
        .await
        .unwrap_err();

    assert!(err.is_foreign_key_violation(), "{err}");
    assert_eq!(table_counts(&pool).await, (1, 0));
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn failed_batch_rolls_back_earlier_rows() {
    let harness = TestDb::start().await.unwrap();
    let pool = harness.fresh_pool().await.unwrap();
    EmployerRecord::insert_all(&pool, &[employer("1", "Точка", 2)])
        .await
        .unwrap();

    let batch = vec![
        vacancy("1", "Python dev", "Точка", 100),
        vacancy("2", "Go dev", "Unknown", 200),
    ];
    assert!(VacancyRecord::insert_all(&pool, &batch).await.is_err());
    assert_eq!(VacancyRecord::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn duplicate_employer_names_are_rejected() {
    let harness = TestDb::start().await.unwrap();
    let pool = harness.fresh_pool().await.unwrap();

    let err = EmployerRecord::insert_all(
        &pool,
        &[employer("1", "Точка", 1), employer("2", "Точка", 5)],
    )
    .await
    .unwrap_err();

    assert!(err.is_unique_violation(), "{err}");
    assert_eq!(table_counts(&pool).await, (0, 0));
}
