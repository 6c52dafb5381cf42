use crate::db::coupon_repository;
use crate::model::app_state::CouponCodeSettings;
use crate::model::coupon::{
    Coupon, CouponError, CouponUseRecord, HashtagCoupon, HashtagLookup, RedeemRequest,
    Redemption, SelectedNumbers,
};
use crate::shared::constants::REUSE_THRESHOLD;
use crate::shared::draw_cache::LatestDrawCache;
use crate::shared::draw_calendar::{draw_date, format_draw_date, next_draw_no};
use crate::shared::util::{generate_coupon_code, non_empty};
use sqlx::{SqliteConnection, SqlitePool};

const MAX_CODE_GENERATION_ATTEMPTS: usize = 5;

/// A redemption request whose fields have been trimmed and validated.
#[derive(Clone, Debug)]
pub struct RedemptionTicket {
    pub coupon_code: String,
    pub hashtag: String,
    pub numbers: SelectedNumbers,
}

impl TryFrom<RedeemRequest> for RedemptionTicket {
    type Error = CouponError;

    fn try_from(value: RedeemRequest) -> Result<Self, Self::Error> {
        let coupon_code =
            non_empty(&value.coupon_code).ok_or(CouponError::MissingField("coupon_code"))?;
        let hashtag =
            non_empty(&value.youtube_hashtag).ok_or(CouponError::MissingField("youtube_hashtag"))?;
        if value.selected_numbers.is_empty() {
            return Err(CouponError::MissingField("selected_numbers"));
        }
        let numbers = SelectedNumbers::try_from(value.selected_numbers.as_slice())
            .map_err(CouponError::InvalidNumbers)?;

        Ok(RedemptionTicket {
            coupon_code,
            hashtag,
            numbers,
        })
    }
}

/// Decides whether `hashtag` may redeem the coupon identified by `coupon_code`.
///
/// An unused coupon is open to anyone. A used coupon may be taken again only by
/// a hashtag that has not used it yet and that has already redeemed at least
/// [`REUSE_THRESHOLD`] coupons of its own.
pub async fn check_eligibility(
    conn: &mut SqliteConnection,
    coupon_code: &str,
    hashtag: &str,
) -> Result<Coupon, CouponError> {
    let coupon = coupon_repository::find_coupon_by_code(&mut *conn, coupon_code)
        .await?
        .ok_or(CouponError::InvalidCoupon)?;

    if !coupon.is_used {
        return Ok(coupon);
    }

    if coupon_repository::coupon_use_exists(&mut *conn, coupon.id, hashtag).await? {
        return Err(CouponError::AlreadyUsedByThisHashtag(hashtag.to_string()));
    }

    let count = coupon_repository::count_uses_by_hashtag(&mut *conn, hashtag).await?;
    if count < REUSE_THRESHOLD {
        return Err(CouponError::HashtagNotEligible {
            hashtag: hashtag.to_string(),
            count,
            threshold: REUSE_THRESHOLD,
        });
    }

    Ok(coupon)
}

pub async fn redeem_coupon(
    pool: &SqlitePool,
    draws: &LatestDrawCache,
    ticket: RedemptionTicket,
) -> Result<Redemption, CouponError> {
    let RedemptionTicket {
        coupon_code,
        hashtag,
        numbers,
    } = ticket;

    // Reject early so that invalid attempts never reach the draw provider.
    {
        let mut conn = pool.acquire().await?;
        check_eligibility(&mut conn, &coupon_code, &hashtag).await?;
    }

    let draw_no = next_draw_no(draws.latest_draw_no().await);
    let draw_date = format_draw_date(draw_date(draw_no));

    // The gate runs again inside the transaction so that the usage row, the
    // used flag and the draw assignment are decided and written together.
    let mut tx = pool.begin().await?;
    coupon_repository::lock_coupons_for_write(&mut *tx).await?;
    let coupon = check_eligibility(&mut tx, &coupon_code, &hashtag).await?;
    let coupon_use_id = coupon_repository::insert_coupon_use(
        &mut *tx,
        coupon.id,
        &hashtag,
        &numbers.to_stored(),
    )
    .await?;
    coupon_repository::mark_coupon_used(&mut *tx, coupon.id).await?;
    coupon_repository::insert_draw_assignment(
        &mut *tx,
        draw_no,
        &draw_date,
        &hashtag,
        coupon_use_id,
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        "Coupon {} redeemed by {} for draw {} ({}).",
        &coupon_code,
        &hashtag,
        draw_no,
        &draw_date
    );

    Ok(Redemption {
        message: format!(
            "Coupon redeemed. Next draw: {}, draw date: {}",
            draw_no, &draw_date
        ),
        draw_no,
        draw_date,
        selected_numbers: numbers.into(),
    })
}

pub async fn create_coupon(
    pool: &SqlitePool,
    settings: &CouponCodeSettings,
) -> Result<Coupon, CouponError> {
    for attempt in 1..=MAX_CODE_GENERATION_ATTEMPTS {
        let coupon_code = generate_coupon_code(settings.prefix.as_deref(), settings.length);
        match coupon_repository::insert_coupon(pool, &coupon_code).await {
            Ok(id) => {
                tracing::info!("Coupon created: {}", &coupon_code);
                return Ok(Coupon {
                    id,
                    coupon_code,
                    is_used: false,
                });
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tracing::warn!(
                    "Coupon code {} already exists (attempt {}).",
                    &coupon_code,
                    attempt
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(CouponError::CodeGenerationExhausted(
        MAX_CODE_GENERATION_ATTEMPTS,
    ))
}

/// Removes the coupon row only. Its usage history stays behind.
pub async fn delete_coupon(pool: &SqlitePool, coupon_id: i64) -> Result<(), CouponError> {
    let coupon = coupon_repository::find_coupon_by_id(pool, coupon_id)
        .await?
        .ok_or(CouponError::CouponNotFound(coupon_id))?;
    let orphaned_uses = coupon_repository::count_uses_by_coupon(pool, coupon_id).await?;

    if coupon_repository::delete_coupon(pool, coupon_id).await? == 0 {
        return Err(CouponError::CouponNotFound(coupon_id));
    }
    tracing::info!(
        "Coupon deleted: {} ({}), {} usage record(s) kept.",
        coupon_id,
        &coupon.coupon_code,
        orphaned_uses
    );
    Ok(())
}

pub async fn get_all_coupons(pool: &SqlitePool) -> Result<Vec<Coupon>, CouponError> {
    Ok(coupon_repository::get_all_coupons(pool).await?)
}

pub async fn get_all_coupon_uses(pool: &SqlitePool) -> Result<Vec<CouponUseRecord>, CouponError> {
    let rows = coupon_repository::get_all_coupon_uses(pool).await?;
    Ok(rows.into_iter().map(CouponUseRecord::from).collect())
}

pub async fn lookup_hashtag(pool: &SqlitePool, hashtag: &str) -> Result<HashtagLookup, CouponError> {
    let hashtag = non_empty(hashtag).ok_or(CouponError::MissingField("hashtag"))?;
    let (rows, used_coupons_count) = futures::try_join!(
        coupon_repository::get_coupon_uses_by_hashtag(pool, &hashtag),
        coupon_repository::count_uses_by_hashtag(pool, &hashtag),
    )?;

    Ok(HashtagLookup {
        data: rows.into_iter().map(HashtagCoupon::from).collect(),
        used_coupons_count,
    })
}

pub async fn total_coupon_uses(pool: &SqlitePool) -> Result<i64, CouponError> {
    Ok(coupon_repository::count_all_uses(pool).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{file_pool, memory_pool, remove_file_pool, StubDrawProvider};
    use std::sync::Arc;
    use std::time::Duration;

    const NUMBERS: [i64; 6] = [6, 11, 17, 19, 40, 43];

    fn draws(latest: Option<u32>) -> LatestDrawCache {
        let provider = match latest {
            Some(latest) => StubDrawProvider::with_latest(latest),
            None => StubDrawProvider::unavailable(),
        };
        LatestDrawCache::new(Arc::new(provider), Duration::from_secs(3600))
    }

    fn ticket(coupon_code: &str, hashtag: &str) -> RedemptionTicket {
        RedemptionTicket::try_from(RedeemRequest {
            coupon_code: coupon_code.to_string(),
            youtube_hashtag: hashtag.to_string(),
            selected_numbers: NUMBERS.to_vec(),
        })
        .unwrap()
    }

    async fn insert(pool: &SqlitePool, coupon_code: &str) -> i64 {
        coupon_repository::insert_coupon(pool, coupon_code)
            .await
            .unwrap()
    }

    async fn coupon(pool: &SqlitePool, coupon_code: &str) -> Coupon {
        coupon_repository::find_coupon_by_code(pool, coupon_code)
            .await
            .unwrap()
            .unwrap()
    }

    /// Gives `hashtag` `count` redemptions of freshly created coupons.
    async fn seed_redemptions(
        pool: &SqlitePool,
        draws: &LatestDrawCache,
        hashtag: &str,
        count: usize,
    ) {
        for i in 0..count {
            let code = format!("SEED{}{:04}", hashtag.trim_start_matches('@'), i);
            insert(pool, &code).await;
            redeem_coupon(pool, draws, ticket(&code, hashtag))
                .await
                .unwrap();
        }
    }

    async fn assert_used_flag_matches_history(pool: &SqlitePool) {
        for coupon in coupon_repository::get_all_coupons(pool).await.unwrap() {
            let uses = coupon_repository::count_uses_by_coupon(pool, coupon.id)
                .await
                .unwrap();
            assert_eq!(coupon.is_used, uses > 0, "coupon {}", coupon.coupon_code);
        }
    }

    #[tokio::test]
    async fn fresh_coupon_is_redeemed() {
        let pool = memory_pool().await;
        let draws = draws(Some(1148));
        insert(&pool, "ABCDEF123456").await;

        let redemption = redeem_coupon(&pool, &draws, ticket("ABCDEF123456", "@alice"))
            .await
            .unwrap();

        assert_eq!(redemption.draw_no, 1149);
        assert_eq!(redemption.draw_date, "2024-12-07");
        assert_eq!(redemption.selected_numbers, vec![6, 11, 17, 19, 40, 43]);
        assert!(coupon(&pool, "ABCDEF123456").await.is_used);
        assert_eq!(
            coupon_repository::count_all_uses(&pool).await.unwrap(),
            1
        );
        assert_used_flag_matches_history(&pool).await;
    }

    #[tokio::test]
    async fn fresh_coupon_ignores_hashtag_history() {
        let pool = memory_pool().await;
        let draws = draws(Some(1148));
        insert(&pool, "FRESH0000001").await;

        // A brand new hashtag with no prior redemptions.
        assert!(redeem_coupon(&pool, &draws, ticket("FRESH0000001", "@newcomer"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn unknown_coupon_is_invalid() {
        let pool = memory_pool().await;
        let draws = draws(Some(1148));

        let result = redeem_coupon(&pool, &draws, ticket("NOPE00000000", "@alice")).await;
        assert!(matches!(result, Err(CouponError::InvalidCoupon)));
    }

    #[tokio::test]
    async fn reuse_gate_scenarios() {
        let pool = memory_pool().await;
        let draws = draws(Some(1148));
        insert(&pool, "ABCDEF123456").await;

        redeem_coupon(&pool, &draws, ticket("ABCDEF123456", "@alice"))
            .await
            .unwrap();

        seed_redemptions(&pool, &draws, "@bob", 2).await;
        match redeem_coupon(&pool, &draws, ticket("ABCDEF123456", "@bob")).await {
            Err(CouponError::HashtagNotEligible {
                hashtag,
                count,
                threshold,
            }) => {
                assert_eq!(hashtag, "@bob");
                assert_eq!(count, 2);
                assert_eq!(threshold, 5);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        seed_redemptions(&pool, &draws, "@carol", 5).await;
        redeem_coupon(&pool, &draws, ticket("ABCDEF123456", "@carol"))
            .await
            .unwrap();
        assert!(coupon(&pool, "ABCDEF123456").await.is_used);
        let coupon_id = coupon(&pool, "ABCDEF123456").await.id;
        assert_eq!(
            coupon_repository::count_uses_by_coupon(&pool, coupon_id)
                .await
                .unwrap(),
            2
        );

        let result = redeem_coupon(&pool, &draws, ticket("ABCDEF123456", "@alice")).await;
        assert!(matches!(
            result,
            Err(CouponError::AlreadyUsedByThisHashtag(ref h)) if h == "@alice"
        ));

        assert_used_flag_matches_history(&pool).await;
    }

    #[tokio::test]
    async fn eligible_hashtag_cannot_take_same_coupon_twice() {
        let pool = memory_pool().await;
        let draws = draws(Some(1148));
        insert(&pool, "SHARED000001").await;
        redeem_coupon(&pool, &draws, ticket("SHARED000001", "@alice"))
            .await
            .unwrap();
        seed_redemptions(&pool, &draws, "@carol", 5).await;

        redeem_coupon(&pool, &draws, ticket("SHARED000001", "@carol"))
            .await
            .unwrap();
        let second = redeem_coupon(&pool, &draws, ticket("SHARED000001", "@carol")).await;

        assert!(matches!(
            second,
            Err(CouponError::AlreadyUsedByThisHashtag(_))
        ));
    }

    #[tokio::test]
    async fn threshold_boundary_is_five() {
        let pool = memory_pool().await;
        let draws = draws(Some(1148));
        insert(&pool, "CLAIMED00001").await;
        redeem_coupon(&pool, &draws, ticket("CLAIMED00001", "@alice"))
            .await
            .unwrap();

        seed_redemptions(&pool, &draws, "@dave", 4).await;
        assert!(matches!(
            redeem_coupon(&pool, &draws, ticket("CLAIMED00001", "@dave")).await,
            Err(CouponError::HashtagNotEligible { count: 4, .. })
        ));

        seed_redemptions(&pool, &draws, "@erin", 5).await;
        assert!(redeem_coupon(&pool, &draws, ticket("CLAIMED00001", "@erin"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn failed_attempts_leave_no_trace() {
        let pool = memory_pool().await;
        let draws = draws(Some(1148));
        insert(&pool, "CLAIMED00002").await;
        redeem_coupon(&pool, &draws, ticket("CLAIMED00002", "@alice"))
            .await
            .unwrap();

        let _ = redeem_coupon(&pool, &draws, ticket("CLAIMED00002", "@bob")).await;
        let _ = redeem_coupon(&pool, &draws, ticket("CLAIMED00002", "@alice")).await;

        assert_eq!(
            coupon_repository::count_all_uses(&pool).await.unwrap(),
            1
        );
        let lookup = lookup_hashtag(&pool, "@bob").await.unwrap();
        assert_eq!(lookup.used_coupons_count, 0);
        assert_used_flag_matches_history(&pool).await;
    }

    #[tokio::test]
    async fn unreachable_provider_assigns_first_draw() {
        let pool = memory_pool().await;
        let draws = draws(None);
        insert(&pool, "OFFLINE00001").await;

        let redemption = redeem_coupon(&pool, &draws, ticket("OFFLINE00001", "@alice"))
            .await
            .unwrap();

        assert_eq!(redemption.draw_no, 1);
        assert_eq!(redemption.draw_date, "2002-12-07");
    }

    #[tokio::test]
    async fn ticket_validation() {
        let request = |code: &str, hashtag: &str, numbers: Vec<i64>| RedeemRequest {
            coupon_code: code.to_string(),
            youtube_hashtag: hashtag.to_string(),
            selected_numbers: numbers,
        };

        assert!(matches!(
            RedemptionTicket::try_from(request(" ", "@alice", NUMBERS.to_vec())),
            Err(CouponError::MissingField("coupon_code"))
        ));
        assert!(matches!(
            RedemptionTicket::try_from(request("CODE", "", NUMBERS.to_vec())),
            Err(CouponError::MissingField("youtube_hashtag"))
        ));
        assert!(matches!(
            RedemptionTicket::try_from(request("CODE", "@alice", vec![])),
            Err(CouponError::MissingField("selected_numbers"))
        ));
        assert!(matches!(
            RedemptionTicket::try_from(request("CODE", "@alice", vec![1, 2, 3, 4, 5, 99])),
            Err(CouponError::InvalidNumbers(_))
        ));

        let ticket = RedemptionTicket::try_from(request(" CODE ", " @alice ", NUMBERS.to_vec()))
            .unwrap();
        assert_eq!(ticket.coupon_code, "CODE");
        assert_eq!(ticket.hashtag, "@alice");
    }

    #[tokio::test]
    async fn deleted_coupon_keeps_orphaned_history() {
        let pool = memory_pool().await;
        let draws = draws(Some(1148));
        let id = insert(&pool, "ABCDEF123456").await;
        redeem_coupon(&pool, &draws, ticket("ABCDEF123456", "@alice"))
            .await
            .unwrap();

        delete_coupon(&pool, id).await.unwrap();

        assert!(matches!(
            redeem_coupon(&pool, &draws, ticket("ABCDEF123456", "@alice")).await,
            Err(CouponError::InvalidCoupon)
        ));
        assert!(coupon_repository::find_coupon_by_id(&pool, id)
            .await
            .unwrap()
            .is_none());

        let lookup = lookup_hashtag(&pool, "@alice").await.unwrap();
        assert_eq!(lookup.used_coupons_count, 1);
        assert_eq!(lookup.data.len(), 1);
        assert_eq!(lookup.data[0].coupon_code, None);
        assert_eq!(lookup.data[0].selected_numbers, vec![6, 11, 17, 19, 40, 43]);

        let uses = get_all_coupon_uses(&pool).await.unwrap();
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].coupon_id, id);
        assert_eq!(uses[0].coupon_code, None);
    }

    #[tokio::test]
    async fn deleting_missing_coupon_fails() {
        let pool = memory_pool().await;
        assert!(matches!(
            delete_coupon(&pool, 42).await,
            Err(CouponError::CouponNotFound(42))
        ));
    }

    #[tokio::test]
    async fn created_coupons_are_unique_and_unused() {
        let pool = memory_pool().await;
        let settings = CouponCodeSettings {
            prefix: Some("LOTTO-".to_string()),
            length: 10,
        };

        let first = create_coupon(&pool, &settings).await.unwrap();
        let second = create_coupon(&pool, &settings).await.unwrap();

        assert_ne!(first.coupon_code, second.coupon_code);
        assert!(first.coupon_code.starts_with("LOTTO-"));
        assert_eq!(first.coupon_code.len(), 16);
        assert!(!first.is_used);

        let coupons = get_all_coupons(&pool).await.unwrap();
        assert_eq!(coupons, vec![first, second]);
    }

    #[tokio::test]
    async fn code_collisions_exhaust_retries() {
        let pool = memory_pool().await;
        // With an empty random part every attempt yields the same code.
        let settings = CouponCodeSettings {
            prefix: Some("FIXED".to_string()),
            length: 0,
        };

        create_coupon(&pool, &settings).await.unwrap();
        assert!(matches!(
            create_coupon(&pool, &settings).await,
            Err(CouponError::CodeGenerationExhausted(5))
        ));
    }

    #[tokio::test]
    async fn lookup_reports_latest_assigned_draw() {
        let pool = memory_pool().await;
        let draws = draws(Some(1148));
        seed_redemptions(&pool, &draws, "@alice", 2).await;
        coupon_repository::insert_draw_assignment(&pool, 1150, "2024-12-14", "@alice", 0)
            .await
            .unwrap();

        let lookup = lookup_hashtag(&pool, "@alice").await.unwrap();
        assert_eq!(lookup.used_coupons_count, 2);
        assert_eq!(lookup.data.len(), 2);
        for coupon in lookup.data.iter() {
            assert_eq!(coupon.draw_no, Some(1150));
            assert_eq!(coupon.draw_date.as_deref(), Some("2024-12-14"));
            assert!(coupon.coupon_code.is_some());
        }

        let uses = get_all_coupon_uses(&pool).await.unwrap();
        assert!(uses.iter().all(|u| u.draw_no == Some(1150)));

        assert!(matches!(
            lookup_hashtag(&pool, "  ").await,
            Err(CouponError::MissingField("hashtag"))
        ));
        assert_eq!(total_coupon_uses(&pool).await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_redemptions_have_one_winner() {
        let (pool, path) = file_pool().await;
        let draws = Arc::new(draws(Some(1148)));

        for round in 0..10 {
            let code = format!("RACE{:08}", round);
            let coupon_id = insert(&pool, &code).await;

            let tasks: Vec<_> = (0..8)
                .map(|i| {
                    let pool = pool.clone();
                    let draws = draws.clone();
                    let ticket = ticket(&code, &format!("@racer{}x{}", round, i));
                    tokio::spawn(async move { redeem_coupon(&pool, &draws, ticket).await })
                })
                .collect();

            let mut winners = 0;
            for task in tasks {
                match task.await.unwrap() {
                    Ok(_) => winners += 1,
                    Err(CouponError::HashtagNotEligible { count: 0, .. }) => {}
                    Err(e) => panic!("round {}: unexpected error: {}", round, e),
                }
            }
            assert_eq!(winners, 1, "round {}", round);
            assert_eq!(
                coupon_repository::count_uses_by_coupon(&pool, coupon_id)
                    .await
                    .unwrap(),
                1
            );
        }

        assert_used_flag_matches_history(&pool).await;
        remove_file_pool(pool, path).await;
    }
}
