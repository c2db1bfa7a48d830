extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    vec, Address, BytesN, Env, IntoVal, TryIntoVal,
};

use crate::events::{
    PricingUpdated, PropertyRegistered, ReservationConfirmed, ReservationReleased,
    TokensReserved,
};
use crate::{LedgerConfig, PropertyLedger, PropertyLedgerClient, ReservationStatus, Role};

struct Fixture {
    env: Env,
    client: PropertyLedgerClient<'static>,
    super_admin: Address,
    manager: Address,
    settler: Address,
}

fn setup() -> Fixture {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(PropertyLedger, ());
    let client = PropertyLedgerClient::new(&env, &contract_id);

    let super_admin = Address::generate(&env);
    client.init(&super_admin, &LedgerConfig::default());
    let manager = Address::generate(&env);
    let settler = Address::generate(&env);
    client.grant_role(&super_admin, &manager, &Role::PropertyManager);
    client.grant_role(&super_admin, &settler, &Role::Settler);

    Fixture {
        env,
        client,
        super_admin,
        manager,
        settler,
    }
}

#[test]
fn test_property_registered_event() {
    let f = setup();
    let supply = f.client.register_property(&f.manager, &5_000, &20, &100);

    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, f.client.address);
    let expected_topics = vec![
        &f.env,
        symbol_short!("prop_reg").into_val(&f.env),
        supply.property_id.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: PropertyRegistered = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        PropertyRegistered {
            property_id: supply.property_id,
            manager: f.manager.clone(),
            total_supply: 5_000,
            token_price: 20,
        }
    );
}

#[test]
fn test_tokens_reserved_event() {
    let f = setup();
    let supply = f.client.register_property(&f.manager, &5_000, &20, &100);
    let investor = Address::generate(&f.env);

    let reservation = f.client.reserve_tokens(&investor, &supply.property_id, &25);

    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &f.env,
        symbol_short!("reserved").into_val(&f.env),
        supply.property_id.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: TokensReserved = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        TokensReserved {
            reservation_id: reservation.id,
            property_id: supply.property_id,
            investor: investor.clone(),
            amount: 25,
            expires_at: reservation.expires_at,
        }
    );
}

#[test]
fn test_reservation_confirmed_event() {
    let f = setup();
    let supply = f.client.register_property(&f.manager, &5_000, &20, &100);
    let investor = Address::generate(&f.env);
    let reservation = f.client.reserve_tokens(&investor, &supply.property_id, &25);
    let payment_ref = BytesN::from_array(&f.env, &[0x11u8; 32]);

    let investment = f.client.confirm_reservation(
        &f.settler,
        &reservation.id,
        &payment_ref,
        &reservation.total_price,
    );

    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &f.env,
        symbol_short!("confirmed").into_val(&f.env),
        supply.property_id.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ReservationConfirmed = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        ReservationConfirmed {
            reservation_id: reservation.id,
            investment_id: investment.id,
            property_id: supply.property_id,
            investor: investor.clone(),
            tokens: 25,
            payment_ref: payment_ref.clone(),
        }
    );
}

#[test]
fn test_expired_release_event() {
    let f = setup();
    let supply = f.client.register_property(&f.manager, &5_000, &20, &100);
    let investor = Address::generate(&f.env);
    let reservation = f.client.reserve_tokens(&investor, &supply.property_id, &25);

    f.env.ledger().set_timestamp(reservation.expires_at);
    f.client.sweep_expired(&supply.property_id, &5);

    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &f.env,
        symbol_short!("released").into_val(&f.env),
        supply.property_id.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ReservationReleased = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        ReservationReleased {
            reservation_id: reservation.id,
            property_id: supply.property_id,
            amount: 25,
            status: ReservationStatus::Expired,
        }
    );
}

#[test]
fn test_property_closed_event() {
    let f = setup();
    let supply = f.client.register_property(&f.manager, &5_000, &20, &100);

    f.client.close_property(&f.manager, &supply.property_id);

    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &f.env,
        symbol_short!("closed").into_val(&f.env),
        supply.property_id.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let closed_by: Address = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(closed_by, f.manager);
}

#[test]
fn test_pricing_updated_event() {
    let f = setup();
    let supply = f.client.register_property(&f.manager, &5_000, &20, &100);

    f.client
        .update_pricing(&f.manager, &supply.property_id, &25, &250);

    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &f.env,
        symbol_short!("repriced").into_val(&f.env),
        supply.property_id.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: PricingUpdated = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        PricingUpdated {
            property_id: supply.property_id,
            token_price: 25,
            minimum_investment: 250,
        }
    );
}

#[test]
fn test_pause_and_unpause_events() {
    let f = setup();

    f.client.pause(&f.super_admin);
    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![&f.env, symbol_short!("paused").into_val(&f.env)];
    assert_eq!(last_event.1, expected_topics);
    let by: Address = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(by, f.super_admin);

    f.client.unpause(&f.super_admin);
    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![&f.env, symbol_short!("unpaused").into_val(&f.env)];
    assert_eq!(last_event.1, expected_topics);
    let by: Address = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(by, f.super_admin);
}

#[test]
fn test_config_updated_event() {
    let f = setup();
    let config = LedgerConfig {
        reservation_ttl: 1_800,
        max_pending_per_property: 16,
    };

    f.client.set_config(&f.super_admin, &config);

    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![&f.env, symbol_short!("config").into_val(&f.env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: LedgerConfig = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(event_data, config);
}

#[test]
fn test_role_granted_and_revoked_events() {
    let f = setup();
    let auditor = Address::generate(&f.env);

    f.client.grant_role(&f.super_admin, &auditor, &Role::Auditor);
    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![
        &f.env,
        symbol_short!("role_set").into_val(&f.env),
        auditor.into_val(&f.env),
        symbol_short!("auditor").into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let by: Option<Address> = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(by, Some(f.super_admin.clone()));

    f.client.revoke_role(&f.super_admin, &auditor);
    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![
        &f.env,
        symbol_short!("role_del").into_val(&f.env),
        auditor.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let by: Option<Address> = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(by, Some(f.super_admin.clone()));
}
