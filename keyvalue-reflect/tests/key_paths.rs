use keyvalue_core::{Obj, reflect};
use keyvalue_reflect::{KeyPath, get_value, key_path, set_value, try_get_value};

#[derive(Clone, Debug, PartialEq)]
struct Manager {
    last_name: String,
}

reflect!(Manager { last_name });

#[derive(Clone, Debug, PartialEq)]
struct Department {
    name: String,
    manager: Manager,
}

reflect!(Department { name, manager });

#[derive(Clone, Debug, PartialEq)]
struct Employee {
    department: Department,
    mentor: Obj<Manager>,
}

reflect!(Employee { department, mentor });

fn employee() -> Employee {
    Employee {
        department: Department {
            name: "R&D".to_string(),
            manager: Manager {
                last_name: "Lovelace".to_string(),
            },
        },
        mentor: Obj::new(Manager {
            last_name: "Babbage".to_string(),
        }),
    }
}

fn string(value: Option<keyvalue_core::Value>) -> Option<String> {
    value.and_then(|value| value.downcast::<String>().ok())
}

#[keyvalue_testhelpers::test]
fn typed_paths_render_their_root() {
    let path = key_path!(Employee.department.manager.last_name);
    assert_eq!(path.rendered(), "Employee.department.manager.last_name");
    assert_eq!(path.key(), "department.manager.last_name");
    assert_eq!(path.to_string(), "Employee.department.manager.last_name");
}

#[keyvalue_testhelpers::test]
fn typed_and_string_paths_agree() {
    let mut employee = employee();
    let typed = key_path!(Employee.department.manager.last_name);

    set_value("Turing".to_string(), &mut employee, typed);
    assert_eq!(employee.department.manager.last_name, "Turing");
    assert_eq!(
        string(get_value(&employee, typed)),
        string(get_value(&employee, "department.manager.last_name"))
    );
    assert_eq!(
        string(get_value(&employee, KeyPath::from_segments(["department", "name"]))),
        Some("R&D".to_string())
    );
}

#[keyvalue_testhelpers::test]
fn typed_paths_walk_through_handles() {
    let employee = Obj::new(employee());
    let mentor = key_path!(Employee.mentor.last_name);
    assert_eq!(string(get_value(&employee, mentor)), Some("Babbage".to_string()));
}

#[keyvalue_testhelpers::test]
fn composed_paths_match_stepwise_access() {
    let employee = employee();
    let department = get_value(&employee, "department")
        .and_then(|value| value.downcast::<Department>().ok())
        .unwrap();
    assert_eq!(
        string(get_value(&department, "manager.last_name")),
        string(get_value(&employee, "department.manager.last_name"))
    );
}

#[keyvalue_testhelpers::test]
fn dangling_segments_find_nothing() {
    let employee = employee();
    assert!(get_value(&employee, "department.").is_none());
    assert!(get_value(&employee, ".department").is_none());
    assert!(get_value(&employee, "department.manager.last_name.len").is_none());
    assert!(try_get_value(&employee, "").is_err());
}
