use crate::model::coupon::{Coupon, CouponUseRow, HashtagCouponRow};
use sqlx::{Executor, Sqlite};

pub async fn find_coupon_by_code<'e, E>(
    executor: E,
    coupon_code: &str,
) -> Result<Option<Coupon>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Coupon>(
        "SELECT id, coupon_code, is_used FROM coupons WHERE coupon_code = ?",
    )
    .bind(coupon_code)
    .fetch_optional(executor)
    .await
}

pub async fn find_coupon_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Coupon>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Coupon>("SELECT id, coupon_code, is_used FROM coupons WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn get_all_coupons<'e, E>(executor: E) -> Result<Vec<Coupon>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Coupon>("SELECT id, coupon_code, is_used FROM coupons ORDER BY id")
        .fetch_all(executor)
        .await
}

pub async fn insert_coupon<'e, E>(executor: E, coupon_code: &str) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("INSERT INTO coupons (coupon_code, is_used) VALUES (?, 0)")
        .bind(coupon_code)
        .execute(executor)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn delete_coupon<'e, E>(executor: E, id: i64) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM coupons WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Takes the database write lock for the surrounding transaction. SQLite only
/// grants it when the statement starts writing, so this must run before any read
/// in the transaction.
pub async fn lock_coupons_for_write<'e, E>(executor: E) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE coupons SET is_used = is_used WHERE id = -1")
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn mark_coupon_used<'e, E>(executor: E, id: i64) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE coupons SET is_used = 1 WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn coupon_use_exists<'e, E>(
    executor: E,
    coupon_id: i64,
    hashtag: &str,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM coupon_uses WHERE coupon_id = ? AND youtube_hashtag = ?)",
    )
    .bind(coupon_id)
    .bind(hashtag)
    .fetch_one(executor)
    .await
}

pub async fn count_uses_by_coupon<'e, E>(executor: E, coupon_id: i64) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM coupon_uses WHERE coupon_id = ?")
        .bind(coupon_id)
        .fetch_one(executor)
        .await
}

pub async fn count_uses_by_hashtag<'e, E>(executor: E, hashtag: &str) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM coupon_uses WHERE youtube_hashtag = ?")
        .bind(hashtag)
        .fetch_one(executor)
        .await
}

pub async fn count_all_uses<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM coupon_uses")
        .fetch_one(executor)
        .await
}

pub async fn insert_coupon_use<'e, E>(
    executor: E,
    coupon_id: i64,
    hashtag: &str,
    selected_numbers: &str,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO coupon_uses (coupon_id, youtube_hashtag, selected_numbers) VALUES (?, ?, ?)",
    )
    .bind(coupon_id)
    .bind(hashtag)
    .bind(selected_numbers)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_draw_assignment<'e, E>(
    executor: E,
    draw_no: u32,
    draw_date: &str,
    hashtag: &str,
    coupon_use_id: i64,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO lotto_draws (draw_no, draw_date, youtube_hashtag, coupon_use_id) VALUES (?, ?, ?, ?)",
    )
    .bind(draw_no)
    .bind(draw_date)
    .bind(hashtag)
    .bind(coupon_use_id)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Every usage record with its coupon code and the highest draw assigned to
/// its hashtag.
pub async fn get_all_coupon_uses<'e, E>(executor: E) -> Result<Vec<CouponUseRow>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, CouponUseRow>(
        r#"SELECT
            cu.id,
            cu.coupon_id,
            c.coupon_code,
            cu.youtube_hashtag,
            cu.selected_numbers,
            cu.used_at,
            ld.draw_no
        FROM coupon_uses cu
        LEFT JOIN coupons c ON cu.coupon_id = c.id
        LEFT JOIN (
            SELECT youtube_hashtag, MAX(draw_no) AS draw_no
            FROM lotto_draws
            GROUP BY youtube_hashtag
        ) ld ON cu.youtube_hashtag = ld.youtube_hashtag
        ORDER BY cu.id"#,
    )
    .fetch_all(executor)
    .await
}

pub async fn get_coupon_uses_by_hashtag<'e, E>(
    executor: E,
    hashtag: &str,
) -> Result<Vec<HashtagCouponRow>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, HashtagCouponRow>(
        r#"SELECT
            c.coupon_code,
            cu.selected_numbers,
            cu.used_at,
            ld.draw_no,
            ld.draw_date
        FROM coupon_uses cu
        LEFT JOIN coupons c ON cu.coupon_id = c.id
        LEFT JOIN (
            SELECT draw_no, draw_date
            FROM lotto_draws
            WHERE youtube_hashtag = ?
            ORDER BY draw_no DESC, id DESC
            LIMIT 1
        ) ld ON 1 = 1
        WHERE cu.youtube_hashtag = ?
        ORDER BY cu.id"#,
    )
    .bind(hashtag)
    .bind(hashtag)
    .fetch_all(executor)
    .await
}
