//! Shared test domain: a dynamic record type and the order sample graph.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use replica_core::{FieldType, FieldValue, Introspect, ObjectRef, TypeDescriptor, TypeRegistry};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

// =============================================================================
// RECORD
// =============================================================================

/// An object whose fields live in a map.
pub struct Record {
    type_name: String,
    fields: RefCell<BTreeMap<String, FieldValue>>,
}

impl Record {
    pub fn new(type_name: &str) -> Rc<Self> {
        Rc::new(Self {
            type_name: type_name.to_string(),
            fields: RefCell::new(BTreeMap::new()),
        })
    }

    pub fn keyed(type_name: &str, key: i64) -> Rc<Self> {
        let record = Self::new(type_name);
        record.set("Key", FieldValue::Int64(key));
        record
    }

    pub fn set(&self, name: &str, value: impl Into<FieldValue>) {
        self.fields
            .borrow_mut()
            .insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.fields.borrow().get(name).cloned()
    }
}

impl Introspect for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name)
    }
}

pub fn obj(record: &Rc<Record>) -> FieldValue {
    FieldValue::object(record.clone())
}

pub fn root(record: &Rc<Record>) -> ObjectRef {
    record.clone()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .expect("valid timestamp")
}

// =============================================================================
// ORDER DOMAIN
// =============================================================================

fn persistent(name: &str) -> TypeDescriptor {
    TypeDescriptor::new(name)
        .field("Key", FieldType::Int64)
        .field("Timestamp", FieldType::String)
}

pub fn order_registry() -> TypeRegistry {
    TypeRegistry::new()
        .with_type(
            persistent("Order")
                .field("Name", FieldType::String)
                .field("Customer", FieldType::entity("Customer"))
                .field("Address", FieldType::entity("Address"))
                .field("Items", FieldType::list(FieldType::entity("Item")))
                .field("SentDate", FieldType::nullable(FieldType::DateTime))
                .field("Alerts", FieldType::array(FieldType::Int64))
                .field("ContactTimes", FieldType::array(FieldType::DateTime))
                .field("Coupons", FieldType::list(FieldType::String))
                .field("Hold", FieldType::Boolean),
        )
        .with_type(
            persistent("Customer")
                .field("FirstName", FieldType::String)
                .field("LastName", FieldType::String)
                .field("Addresses", FieldType::list(FieldType::entity("Address"))),
        )
        .with_type(
            persistent("Address")
                .field("Customer", FieldType::entity("Customer"))
                .field("Street", FieldType::String)
                .field("City", FieldType::String)
                .field("AddressType", FieldType::enumeration("AddressType"))
                .field("ZipCode", FieldType::Int32),
        )
        .with_type(
            persistent("Department")
                .field("Name", FieldType::String)
                .field("Description", FieldType::String),
        )
        .with_type(
            persistent("Category")
                .field("Name", FieldType::String)
                .field("SortOrder", FieldType::Int16)
                .field("Departments", FieldType::array(FieldType::entity("Department"))),
        )
        .with_type(
            persistent("Product")
                .field("Name", FieldType::String)
                .field("Category", FieldType::entity("Category")),
        )
        .with_type(
            persistent("Item")
                .field("Order", FieldType::entity("Order"))
                .field("Quantity", FieldType::Int32)
                .field("Price", FieldType::Single)
                .field("Product", FieldType::entity("Product")),
        )
}

fn stamped(type_name: &str, key: i64, timestamp: &str) -> Rc<Record> {
    let record = Record::keyed(type_name, key);
    record.set("Timestamp", timestamp);
    record
}

/// The order sample: one order, one customer with two addresses, three
/// items of which two share a product, and overlapping departments.
pub fn order_graph() -> Rc<Record> {
    let customer = stamped("Customer", 1, "3");
    customer.set("FirstName", "Mortimer");
    customer.set("LastName", "Sneurd");

    let home = stamped("Address", 0, "1");
    home.set("Customer", obj(&customer));
    home.set("Street", "1313 Mockingbird Lane");
    home.set("City", "Candy Land");
    home.set("AddressType", FieldValue::member("Residential"));
    home.set("ZipCode", FieldValue::Int32(90210));

    let business = stamped("Address", 1, "2");
    business.set("Customer", obj(&customer));
    business.set("Street", "411 Bonham");
    business.set("City", "Sao Antonio");
    business.set("AddressType", FieldValue::member("Business"));
    business.set("ZipCode", FieldValue::Int32(66016));

    customer.set(
        "Addresses",
        FieldValue::objects(&[home.clone(), business.clone()]),
    );

    let electronics = stamped("Department", 0, "4");
    electronics.set("Name", "Electronics");
    electronics.set("Description", "Batteries and cables");
    let computers = stamped("Department", 1, "5");
    computers.set("Name", "Computers");
    let music = stamped("Department", 2, "6");
    music.set("Name", "Music");

    let batteries = stamped("Category", 0, "7");
    batteries.set("Name", "Batteries");
    batteries.set("SortOrder", FieldValue::Int16(1));
    batteries.set(
        "Departments",
        FieldValue::objects(&[electronics.clone(), computers.clone()]),
    );

    let sheet_music = stamped("Category", 2, "8");
    sheet_music.set("Name", "Sheet Music");
    sheet_music.set("SortOrder", FieldValue::Int16(2));
    sheet_music.set("Departments", FieldValue::objects(&[computers, music]));

    let everready = stamped("Product", 0, "9");
    everready.set("Name", "Everready");
    everready.set("Category", obj(&batteries));

    let theme = stamped("Product", 1, "10");
    theme.set("Name", "Shroeder's Theme");
    theme.set("Category", obj(&sheet_music));

    let item0 = stamped("Item", 0, "11");
    item0.set("Price", FieldValue::Single(13.13));
    item0.set("Quantity", FieldValue::Int32(6));
    item0.set("Product", obj(&everready));

    let item1 = stamped("Item", 1, "12");
    item1.set("Price", FieldValue::Single(15.0));
    item1.set("Quantity", FieldValue::Int32(1));
    item1.set("Product", obj(&theme));

    let item2 = stamped("Item", 2, "13");
    item2.set("Price", FieldValue::Single(5.0));
    item2.set("Quantity", FieldValue::Int32(1));
    item2.set("Product", obj(&everready));

    let order = stamped("Order", 1, "14");
    order.set("Name", "Business Order #1");
    order.set("Customer", obj(&customer));
    order.set("Address", obj(&business));
    order.set(
        "Items",
        FieldValue::objects(&[item0.clone(), item1.clone(), item2.clone()]),
    );
    order.set("SentDate", FieldValue::Null);
    order.set("Hold", true);
    order.set("Coupons", FieldValue::sequence(["Summer", "Fall"]));
    order.set("Alerts", FieldValue::sequence([1234i64, 5678i64]));
    order.set(
        "ContactTimes",
        FieldValue::sequence([at(2013, 12, 25, 9, 30, 0), at(2014, 1, 1, 10, 0, 0)]),
    );

    for item in [&item0, &item1, &item2] {
        item.set("Order", obj(&order));
    }

    order
}
