use std::sync::Arc;

use crate::booking::{BookingServiceDeps, BookingServiceImpl};
use crate::test::error_test::*;
use dao::booking::{BookingEntity, MockBookingDao};
use dao::{MockTransaction, MockTransactionDao};
use mockall::predicate::{always, eq};
use service::account::MockAccountService;
use service::booking::{Booking, BookingFilter, BookingService, PageRequest};
use service::clock::MockClockService;
use service::permission::{Actor, Role};
use service::uuid_service::MockUuidService;
use service::{MockPermissionService, ValidationFailureItem};
use time::macros::{date, datetime};
use time::Duration;
use uuid::{uuid, Uuid};

pub struct BookingServiceDependencies {
    pub booking_dao: MockBookingDao,
    pub permission_service: MockPermissionService,
    pub account_service: MockAccountService,
    pub clock_service: MockClockService,
    pub uuid_service: MockUuidService,
    pub transaction_dao: MockTransactionDao,
}
impl BookingServiceDeps for BookingServiceDependencies {
    type Context = ();
    type Transaction = MockTransaction;
    type BookingDao = MockBookingDao;
    type PermissionService = MockPermissionService;
    type AccountService = MockAccountService;
    type ClockService = MockClockService;
    type UuidService = MockUuidService;
    type TransactionDao = MockTransactionDao;
}
impl BookingServiceDependencies {
    pub fn build_service(self) -> BookingServiceImpl<BookingServiceDependencies> {
        BookingServiceImpl {
            booking_dao: self.booking_dao.into(),
            permission_service: self.permission_service.into(),
            account_service: self.account_service.into(),
            clock_service: self.clock_service.into(),
            uuid_service: self.uuid_service.into(),
            transaction_dao: self.transaction_dao.into(),
        }
    }
}

pub fn default_id() -> Uuid {
    uuid!("CEA260A0-112B-4970-936C-F7E529955BD0")
}
pub fn alternate_id() -> Uuid {
    uuid!("CEA260A0-112B-4970-936C-F7E529955BD1")
}
pub fn default_version() -> Uuid {
    uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E50")
}
pub fn alternate_version() -> Uuid {
    uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E51")
}
pub fn alice_id() -> Uuid {
    uuid!("04215DFE-13C4-413C-8C66-77AC741BB5F0")
}
pub fn bob_id() -> Uuid {
    uuid!("04215DFE-13C4-413C-8C66-77AC741BB5F1")
}
pub fn unknown_owner_id() -> Uuid {
    uuid!("04215DFE-13C4-413C-8C66-77AC741BB5F2")
}

pub fn default_booking_entity() -> BookingEntity {
    BookingEntity {
        id: default_id(),
        owner_id: alice_id(),
        start_date: date!(2024 - 03 - 01),
        end_date: date!(2024 - 03 - 05),
        cost_per_day: 80.0,
        post_code: "10115".into(),
        city: "Berlin".into(),
        street: "Invalidenstrasse 1".into(),
        created: datetime!(2024 - 02 - 01 12:00:00),
        deleted: None,
        version: default_version(),
    }
}

pub fn default_booking() -> Booking {
    Booking {
        id: default_id(),
        owner_id: alice_id(),
        username: Some("alice".into()),
        start_date: date!(2024 - 03 - 01),
        end_date: date!(2024 - 03 - 05),
        cost_per_day: 80.0,
        post_code: "10115".into(),
        city: "Berlin".into(),
        street: "Invalidenstrasse 1".into(),
        created: Some(datetime!(2024 - 02 - 01 12:00:00)),
        deleted: None,
        version: default_version(),
    }
}

pub fn new_booking() -> Booking {
    Booking {
        id: Uuid::nil(),
        owner_id: Uuid::nil(),
        username: None,
        created: None,
        version: Uuid::nil(),
        ..default_booking()
    }
}

fn actor(role: Role) -> Actor {
    Actor {
        id: alice_id(),
        name: "alice".into(),
        role,
    }
}

pub fn build_dependencies(role: Role) -> BookingServiceDependencies {
    let mut permission_service = MockPermissionService::new();
    permission_service
        .expect_current_actor()
        .returning(move |_, _| Ok(actor(role)));

    let mut clock_service = MockClockService::new();
    clock_service
        .expect_date_time_now()
        .returning(generate_default_datetime);

    let mut transaction_dao = MockTransactionDao::new();
    transaction_dao
        .expect_use_transaction()
        .returning(|_| Ok(MockTransaction));
    transaction_dao.expect_commit().returning(|_| Ok(()));

    BookingServiceDependencies {
        booking_dao: MockBookingDao::new(),
        permission_service,
        account_service: MockAccountService::new(),
        clock_service,
        uuid_service: MockUuidService::new(),
        transaction_dao,
    }
}

fn expect_usernames(account_service: &mut MockAccountService) {
    account_service
        .expect_get_username()
        .with(eq(alice_id()), always(), always())
        .returning(|_, _, _| Ok(Some("alice".into())));
    account_service
        .expect_get_username()
        .with(eq(bob_id()), always(), always())
        .returning(|_, _, _| Ok(Some("bob".into())));
    account_service
        .expect_get_username()
        .with(eq(unknown_owner_id()), always(), always())
        .returning(|_, _, _| Ok(None));
}

/// Ten bookings, alternating between alice and bob, one day each in March.
fn ten_booking_entities() -> Arc<[BookingEntity]> {
    (0..10u8)
        .map(|index| BookingEntity {
            id: Uuid::from_u128(u128::from(index) + 1),
            owner_id: if index % 2 == 0 { alice_id() } else { bob_id() },
            start_date: date!(2024 - 03 - 01) + Duration::days(index.into()),
            end_date: date!(2024 - 03 - 02) + Duration::days(index.into()),
            cost_per_day: 10.0 * f64::from(index + 1),
            ..default_booking_entity()
        })
        .collect()
}

#[tokio::test]
async fn test_get_all_elevated() {
    let mut dependencies = build_dependencies(Role::Elevated);
    dependencies
        .booking_dao
        .expect_all()
        .times(1)
        .returning(|_| Ok(ten_booking_entities()));
    dependencies
        .account_service
        .expect_get_username()
        .with(eq(alice_id()), always(), always())
        .times(1)
        .returning(|_, _, _| Ok(Some("alice".into())));
    dependencies
        .account_service
        .expect_get_username()
        .with(eq(bob_id()), always(), always())
        .times(1)
        .returning(|_, _, _| Ok(Some("bob".into())));
    let booking_service = dependencies.build_service();

    let page = booking_service
        .get_all(
            &BookingFilter::default(),
            PageRequest::default(),
            ().auth(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(10, page.bookings.len());
    assert_eq!(0, page.page_count);
    assert!(!page.has_next);
    assert_eq!(Some("alice".into()), page.bookings[0].username);
    assert_eq!(Some("bob".into()), page.bookings[1].username);
    let ids: Vec<Uuid> = page.bookings.iter().map(|booking| booking.id).collect();
    let expected: Vec<Uuid> = (1..=10u128).map(Uuid::from_u128).collect();
    assert_eq!(expected, ids);
}

#[tokio::test]
async fn test_get_all_restricted_only_fetches_own() {
    let mut dependencies = build_dependencies(Role::Restricted);
    dependencies
        .booking_dao
        .expect_find_by_owner()
        .with(eq(alice_id()), always())
        .times(1)
        .returning(|_, _| Ok([default_booking_entity()].into()));
    expect_usernames(&mut dependencies.account_service);
    let booking_service = dependencies.build_service();

    let page = booking_service
        .get_all(
            &BookingFilter::default(),
            PageRequest::default(),
            ().auth(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(1, page.bookings.len());
    assert_eq!(default_booking(), page.bookings[0]);
}

#[tokio::test]
async fn test_get_all_paginated() {
    let mut dependencies = build_dependencies(Role::Elevated);
    dependencies
        .booking_dao
        .expect_all()
        .returning(|_| Ok(ten_booking_entities()));
    expect_usernames(&mut dependencies.account_service);
    let booking_service = dependencies.build_service();

    let first = booking_service
        .get_all(
            &BookingFilter::default(),
            PageRequest::new(3, 1),
            ().auth(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(4, first.page_count);
    assert!(first.has_next);
    let ids: Vec<Uuid> = first.bookings.iter().map(|booking| booking.id).collect();
    assert_eq!(
        vec![Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3)],
        ids
    );

    let last = booking_service
        .get_all(
            &BookingFilter::default(),
            PageRequest::new(3, 4),
            ().auth(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(4, last.page_count);
    assert!(!last.has_next);
    assert_eq!(1, last.bookings.len());
    assert_eq!(Uuid::from_u128(10), last.bookings[0].id);

    let out_of_range = booking_service
        .get_all(
            &BookingFilter::default(),
            PageRequest::new(3, 5),
            ().auth(),
            None,
        )
        .await
        .unwrap();
    assert!(out_of_range.bookings.is_empty());
    assert_eq!(4, out_of_range.page_count);

    let too_large = booking_service
        .get_all(
            &BookingFilter::default(),
            PageRequest::new(11, 1),
            ().auth(),
            None,
        )
        .await
        .unwrap();
    assert!(too_large.bookings.is_empty());
    assert_eq!(0, too_large.page_count);
    assert!(!too_large.has_next);
}

#[tokio::test]
async fn test_get_all_filtered_then_paginated() {
    let mut dependencies = build_dependencies(Role::Elevated);
    dependencies
        .booking_dao
        .expect_all()
        .returning(|_| Ok(ten_booking_entities()));
    expect_usernames(&mut dependencies.account_service);
    let booking_service = dependencies.build_service();

    let page = booking_service
        .get_all(
            &BookingFilter {
                username: Some("bob".into()),
                cost_down: Some(30.0),
                start_date_to: Some("09-03-2024".into()),
                ..Default::default()
            },
            PageRequest::new(2, 1),
            ().auth(),
            None,
        )
        .await
        .unwrap();
    // bob owns the even ids, the cost and date bounds leave 4, 6 and 8.
    assert_eq!(2, page.page_count);
    assert!(page.has_next);
    let ids: Vec<Uuid> = page.bookings.iter().map(|booking| booking.id).collect();
    assert_eq!(vec![Uuid::from_u128(4), Uuid::from_u128(6)], ids);
}

#[tokio::test]
async fn test_get_all_invalid_date() {
    let booking_service = build_dependencies(Role::Elevated).build_service();
    let result = booking_service
        .get_all(
            &BookingFilter {
                start_date_from: Some("31-02-2024".into()),
                ..Default::default()
            },
            PageRequest::default(),
            ().auth(),
            None,
        )
        .await;
    test_date_format_error(&result);
}

#[tokio::test]
async fn test_get() {
    let mut dependencies = build_dependencies(Role::Restricted);
    dependencies
        .booking_dao
        .expect_find_by_id()
        .with(eq(default_id()), always())
        .returning(|_, _| Ok(Some(default_booking_entity())));
    expect_usernames(&mut dependencies.account_service);
    let booking_service = dependencies.build_service();
    let booking = booking_service
        .get(default_id(), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(default_booking(), booking);
}

#[tokio::test]
async fn test_get_other_owner_restricted() {
    let mut dependencies = build_dependencies(Role::Restricted);
    dependencies
        .booking_dao
        .expect_find_by_id()
        .with(eq(default_id()), always())
        .returning(|_, _| {
            Ok(Some(BookingEntity {
                owner_id: bob_id(),
                ..default_booking_entity()
            }))
        });
    let booking_service = dependencies.build_service();
    test_forbidden(&booking_service.get(default_id(), ().auth(), None).await);
}

#[tokio::test]
async fn test_get_other_owner_elevated() {
    let mut dependencies = build_dependencies(Role::Elevated);
    dependencies
        .booking_dao
        .expect_find_by_id()
        .with(eq(default_id()), always())
        .returning(|_, _| {
            Ok(Some(BookingEntity {
                owner_id: bob_id(),
                ..default_booking_entity()
            }))
        });
    expect_usernames(&mut dependencies.account_service);
    let booking_service = dependencies.build_service();
    let booking = booking_service
        .get(default_id(), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(bob_id(), booking.owner_id);
    assert_eq!(Some("bob".into()), booking.username);
}

#[tokio::test]
async fn test_get_not_found() {
    let mut dependencies = build_dependencies(Role::Elevated);
    dependencies
        .booking_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    let booking_service = dependencies.build_service();
    test_not_found(
        &booking_service.get(default_id(), ().auth(), None).await,
        &default_id(),
    );
}

fn expect_new_ids(uuid_service: &mut MockUuidService) {
    uuid_service
        .expect_new_uuid()
        .with(eq("booking-id"))
        .returning(|_| default_id());
    uuid_service
        .expect_new_uuid()
        .with(eq("booking-version"))
        .returning(|_| default_version());
}

#[tokio::test]
async fn test_create() {
    let mut dependencies = build_dependencies(Role::Restricted);
    expect_usernames(&mut dependencies.account_service);
    expect_new_ids(&mut dependencies.uuid_service);
    dependencies
        .booking_dao
        .expect_create()
        .with(
            eq(BookingEntity {
                created: generate_default_datetime(),
                ..default_booking_entity()
            }),
            eq("booking-service"),
            always(),
        )
        .times(1)
        .returning(|_, _, _| Ok(()));
    let booking_service = dependencies.build_service();
    let booking = booking_service
        .create(&new_booking(), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(
        Booking {
            created: Some(generate_default_datetime()),
            ..default_booking()
        },
        booking
    );
}

#[tokio::test]
async fn test_create_for_other_owner_elevated() {
    let mut dependencies = build_dependencies(Role::Elevated);
    expect_usernames(&mut dependencies.account_service);
    expect_new_ids(&mut dependencies.uuid_service);
    dependencies
        .booking_dao
        .expect_create()
        .times(1)
        .returning(|_, _, _| Ok(()));
    let booking_service = dependencies.build_service();
    let booking = booking_service
        .create(
            &Booking {
                owner_id: bob_id(),
                ..new_booking()
            },
            ().auth(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(bob_id(), booking.owner_id);
    assert_eq!(Some("bob".into()), booking.username);
}

#[tokio::test]
async fn test_create_for_other_owner_restricted() {
    let booking_service = build_dependencies(Role::Restricted).build_service();
    test_forbidden(
        &booking_service
            .create(
                &Booking {
                    owner_id: bob_id(),
                    ..new_booking()
                },
                ().auth(),
                None,
            )
            .await,
    );
}

#[tokio::test]
async fn test_create_with_id_or_version() {
    let booking_service = build_dependencies(Role::Elevated).build_service();
    test_zero_id_error(
        &booking_service
            .create(
                &Booking {
                    id: default_id(),
                    ..new_booking()
                },
                ().auth(),
                None,
            )
            .await,
    );
    test_zero_version_error(
        &booking_service
            .create(
                &Booking {
                    version: default_version(),
                    ..new_booking()
                },
                ().auth(),
                None,
            )
            .await,
    );
}

#[tokio::test]
async fn test_create_date_order_wrong() {
    let booking_service = build_dependencies(Role::Elevated).build_service();
    test_date_order_wrong(
        &booking_service
            .create(
                &Booking {
                    start_date: date!(2024 - 03 - 06),
                    ..new_booking()
                },
                ().auth(),
                None,
            )
            .await,
    );
}

#[tokio::test]
async fn test_create_validation() {
    let booking_service = build_dependencies(Role::Elevated).build_service();
    let result = booking_service
        .create(
            &Booking {
                cost_per_day: -1.0,
                city: "".into(),
                ..new_booking()
            },
            ().auth(),
            None,
        )
        .await;
    test_validation_error(
        &result,
        &ValidationFailureItem::InvalidValue("cost_per_day".into()),
        2,
    );
    test_validation_error(
        &result,
        &ValidationFailureItem::InvalidValue("city".into()),
        2,
    );
}

#[tokio::test]
async fn test_create_unknown_owner() {
    let mut dependencies = build_dependencies(Role::Elevated);
    expect_usernames(&mut dependencies.account_service);
    let booking_service = dependencies.build_service();
    test_validation_error(
        &booking_service
            .create(
                &Booking {
                    owner_id: unknown_owner_id(),
                    ..new_booking()
                },
                ().auth(),
                None,
            )
            .await,
        &ValidationFailureItem::InvalidValue("owner_id".into()),
        1,
    );
}

#[tokio::test]
async fn test_update() {
    let mut dependencies = build_dependencies(Role::Restricted);
    expect_usernames(&mut dependencies.account_service);
    dependencies
        .booking_dao
        .expect_find_by_id()
        .with(eq(default_id()), always())
        .returning(|_, _| Ok(Some(default_booking_entity())));
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("booking-version"))
        .returning(|_| alternate_version());
    let expected_entity = BookingEntity {
        end_date: date!(2024 - 03 - 10),
        cost_per_day: 95.5,
        street: "Chausseestrasse 5".into(),
        version: alternate_version(),
        ..default_booking_entity()
    };
    dependencies
        .booking_dao
        .expect_update()
        .with(eq(expected_entity), eq("booking-service"), always())
        .times(1)
        .returning(|_, _, _| Ok(()));
    let booking_service = dependencies.build_service();

    let booking = booking_service
        .update(
            default_id(),
            &Booking {
                end_date: date!(2024 - 03 - 10),
                cost_per_day: 95.5,
                street: "Chausseestrasse 5".into(),
                ..new_booking()
            },
            ().auth(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(
        Booking {
            end_date: date!(2024 - 03 - 10),
            cost_per_day: 95.5,
            street: "Chausseestrasse 5".into(),
            version: alternate_version(),
            ..default_booking()
        },
        booking
    );
}

#[tokio::test]
async fn test_update_move_owner_restricted() {
    let mut dependencies = build_dependencies(Role::Restricted);
    dependencies
        .booking_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_booking_entity())));
    let booking_service = dependencies.build_service();
    test_forbidden(
        &booking_service
            .update(
                default_id(),
                &Booking {
                    owner_id: bob_id(),
                    ..default_booking()
                },
                ().auth(),
                None,
            )
            .await,
    );
}

#[tokio::test]
async fn test_update_other_owner_restricted() {
    let mut dependencies = build_dependencies(Role::Restricted);
    dependencies.booking_dao.expect_find_by_id().returning(|_, _| {
        Ok(Some(BookingEntity {
            owner_id: bob_id(),
            ..default_booking_entity()
        }))
    });
    let booking_service = dependencies.build_service();
    test_forbidden(
        &booking_service
            .update(default_id(), &new_booking(), ().auth(), None)
            .await,
    );
}

#[tokio::test]
async fn test_update_not_found() {
    let mut dependencies = build_dependencies(Role::Elevated);
    dependencies
        .booking_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    let booking_service = dependencies.build_service();
    test_not_found(
        &booking_service
            .update(alternate_id(), &new_booking(), ().auth(), None)
            .await,
        &alternate_id(),
    );
}

#[tokio::test]
async fn test_delete() {
    let mut dependencies = build_dependencies(Role::Restricted);
    dependencies
        .booking_dao
        .expect_find_by_id()
        .with(eq(default_id()), always())
        .returning(|_, _| Ok(Some(default_booking_entity())));
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("booking-version"))
        .returning(|_| alternate_version());
    dependencies
        .booking_dao
        .expect_update()
        .with(
            eq(BookingEntity {
                deleted: Some(generate_default_datetime()),
                version: alternate_version(),
                ..default_booking_entity()
            }),
            eq("booking-service"),
            always(),
        )
        .times(1)
        .returning(|_, _, _| Ok(()));
    let booking_service = dependencies.build_service();
    booking_service
        .delete(default_id(), ().auth(), None)
        .await
        .expect("Expected successful delete");
}

#[tokio::test]
async fn test_delete_other_owner_restricted() {
    let mut dependencies = build_dependencies(Role::Restricted);
    dependencies.booking_dao.expect_find_by_id().returning(|_, _| {
        Ok(Some(BookingEntity {
            owner_id: bob_id(),
            ..default_booking_entity()
        }))
    });
    let booking_service = dependencies.build_service();
    test_forbidden(&booking_service.delete(default_id(), ().auth(), None).await);
}

#[tokio::test]
async fn test_delete_not_found() {
    let mut dependencies = build_dependencies(Role::Elevated);
    dependencies
        .booking_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    let booking_service = dependencies.build_service();
    test_not_found(
        &booking_service.delete(default_id(), ().auth(), None).await,
        &default_id(),
    );
}
