//! P4 — the type-checking pass (`spec.md` §4.4): walks every expression,
//! resolves variable references, and writes an inferred `(kind, name)`
//! annotation onto each node. An immutable environment record is
//! threaded through the recursive walk rather than mutating globals
//! (`spec.md` §9's redesign of the "one-slot let binding" into a
//! lexical stack, so nested `let`s resolve correctly).

use jzero_ast::{BinOp, Expr, ExprKind, Program, UnOp};
use jzero_symtab::{ClassTable, FieldTable, FormalTable, MethodTable, StaticType};

use crate::error::SemanticError;
use crate::resolve::resolve_declared_type;

pub(crate) fn check_types(
    program: &mut Program,
    classes: &ClassTable,
    methods: &MethodTable,
    fields: &FieldTable,
    formals: &FormalTable,
) -> Result<(), SemanticError> {
    let checker = Checker { classes, methods, fields, formals };

    for class in &mut program.classes {
        // Object's own methods are synthesized with placeholder `Unit`
        // bodies that can never conform to declared returns like
        // `string`/`bool` — they're stipulated, not user code, so body
        // conformance is only checked for classes other than Object.
        let check_bodies = class.name != "Object";

        for field in &mut class.fields {
            if let Some(init) = &mut field.init {
                let env = Env::for_field_init(&class.name);
                let init_ty = checker.check_expr(init, &env)?;
                let declared = resolve_declared_type(&field.ty, &class.name, classes)
                    .expect("P3 already validated every declared field type");
                if !checker.conforms(&init_ty, &declared) {
                    return Err(SemanticError::FieldInitNonConformance {
                        class: class.name.clone(),
                        field: field.name.clone(),
                        pos: field.pos.clone(),
                    });
                }
            }
        }

        for method in &mut class.methods {
            let env = Env::for_method(&class.name, &method.name);
            let body_ty = checker.check_expr(&mut method.body, &env)?;
            if check_bodies {
                let declared = resolve_declared_type(&method.ret_ty, &class.name, classes)
                    .expect("P3 already validated every declared return type");
                if !checker.conforms(&body_ty, &declared) {
                    return Err(SemanticError::MethodBodyNonConformance {
                        class: class.name.clone(),
                        method: method.name.clone(),
                        pos: method.pos.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

/// The lexical environment threaded through the walk: which class and
/// method enclose the current expression, the stack of active `let`
/// bindings (innermost last), and whether we're inside a field
/// initializer (where `self` and field access are forbidden).
struct Env<'a> {
    class: &'a str,
    method: Option<&'a str>,
    lets: Vec<(String, StaticType)>,
    in_field_init: bool,
}

impl<'a> Env<'a> {
    fn for_method(class: &'a str, method: &'a str) -> Self {
        Env { class, method: Some(method), lets: Vec::new(), in_field_init: false }
    }

    fn for_field_init(class: &'a str) -> Self {
        Env { class, method: None, lets: Vec::new(), in_field_init: true }
    }

    fn with_let(&self, name: String, ty: StaticType) -> Env<'a> {
        let mut lets = self.lets.clone();
        lets.push((name, ty));
        Env { class: self.class, method: self.method, lets, in_field_init: self.in_field_init }
    }

    fn lookup_let(&self, name: &str) -> Option<&StaticType> {
        self.lets.iter().rev().find(|(n, _)| n == name).map(|(_, ty)| ty)
    }
}

struct Checker<'a> {
    classes: &'a ClassTable,
    methods: &'a MethodTable,
    fields: &'a FieldTable,
    formals: &'a FormalTable,
}

impl<'a> Checker<'a> {
    /// `spec.md` §4.4's conformance relation: reflexive identity on
    /// primitives, ancestor-chain on classes, never across the two.
    fn conforms(&self, from: &StaticType, to: &StaticType) -> bool {
        if from.is_primitive() && to.is_primitive() {
            from.kind == to.kind
        } else if from.is_class() && to.is_class() {
            self.classes.is_ancestor_or_self(&from.name, &to.name)
        } else {
            false
        }
    }

    fn check_expr(&self, expr: &mut Expr, env: &Env) -> Result<StaticType, SemanticError> {
        let ty = self.infer(expr, env)?;
        expr.set_type(ty.clone());
        Ok(ty)
    }

    fn infer(&self, expr: &mut Expr, env: &Env) -> Result<StaticType, SemanticError> {
        let pos = expr.pos.clone();
        match &mut expr.kind {
            ExprKind::Unit => Ok(StaticType::unit()),
            ExprKind::Int(_) => Ok(StaticType::int32()),
            ExprKind::Str(_) => Ok(StaticType::string()),
            ExprKind::Bool(_) => Ok(StaticType::bool()),

            ExprKind::Paren(inner) => self.check_expr(inner, env),

            ExprKind::Block(exprs) => {
                let mut last = StaticType::unit();
                for e in exprs.iter_mut() {
                    last = self.check_expr(e, env)?;
                }
                Ok(last)
            }

            ExprKind::UnOp { op, expr: operand } => {
                let operand_ty = self.check_expr(operand, env)?;
                match op {
                    UnOp::Neg => {
                        if operand_ty.kind != jzero_symtab::TypeKind::Int32 {
                            return Err(SemanticError::OperandKindMismatch { construct: "-".to_string(), pos });
                        }
                        Ok(StaticType::int32())
                    }
                    UnOp::Not => {
                        if operand_ty.kind != jzero_symtab::TypeKind::Bool {
                            return Err(SemanticError::OperandKindMismatch { construct: "not".to_string(), pos });
                        }
                        Ok(StaticType::bool())
                    }
                    UnOp::IsNull => {
                        if !operand_ty.is_class() {
                            return Err(SemanticError::OperandKindMismatch { construct: "isnull".to_string(), pos });
                        }
                        Ok(StaticType::bool())
                    }
                }
            }

            ExprKind::BinOp { op, lhs, rhs } => {
                let lhs_ty = self.check_expr(lhs, env)?;
                let rhs_ty = self.check_expr(rhs, env)?;
                self.check_binop(*op, &lhs_ty, &rhs_ty, &pos)
            }

            ExprKind::New(class_name) => {
                if !self.classes.contains(class_name) {
                    return Err(SemanticError::UndefinedType { ty: class_name.clone(), pos });
                }
                Ok(StaticType::class(class_name.clone()))
            }

            ExprKind::Var(name) => self.resolve_var(name, env, &pos),

            ExprKind::Let { name, ty, init, scope } => {
                let declared = resolve_declared_type(ty, env.class, self.classes)
                    .expect("P3 already validated every declared let type");
                if let Some(init) = init {
                    let init_ty = self.check_expr(init, env)?;
                    if !self.conforms(&init_ty, &declared) {
                        return Err(SemanticError::LetInitNonConformance { name: name.clone(), pos });
                    }
                }
                let inner_env = env.with_let(name.clone(), declared);
                self.check_expr(scope, &inner_env)
            }

            ExprKind::Assign { name, expr: rhs } => {
                let target_ty = self.resolve_var(name, env, &pos)?;
                let rhs_ty = self.check_expr(rhs, env)?;
                if !self.conforms(&rhs_ty, &target_ty) {
                    return Err(SemanticError::AssignNonConformance { name: name.clone(), pos });
                }
                Ok(rhs_ty)
            }

            ExprKind::While { cond, body } => {
                let cond_ty = self.check_expr(cond, env)?;
                if cond_ty.kind != jzero_symtab::TypeKind::Bool {
                    return Err(SemanticError::WhileConditionNotBool { pos });
                }
                self.check_expr(body, env)?;
                Ok(StaticType::unit())
            }

            ExprKind::If { cond, then_branch, else_branch } => {
                let cond_ty = self.check_expr(cond, env)?;
                if cond_ty.kind != jzero_symtab::TypeKind::Bool {
                    return Err(SemanticError::IfConditionNotBool { pos });
                }
                let then_ty = self.check_expr(then_branch, env)?;
                match else_branch {
                    None => Ok(StaticType::unit()),
                    Some(else_branch) => {
                        let else_ty = self.check_expr(else_branch, env)?;
                        self.join_branches(&then_ty, &else_ty, &pos)
                    }
                }
            }

            ExprKind::Call { receiver, method, args } => {
                let receiver_ty = self.check_expr(receiver, env)?;
                if !receiver_ty.is_class() {
                    return Err(SemanticError::UnknownMethod {
                        receiver: receiver_ty.name.clone(),
                        method: method.clone(),
                        pos,
                    });
                }
                let declaring = self
                    .methods
                    .find_declaring_class(self.classes, &receiver_ty.name, method)
                    .ok_or_else(|| SemanticError::UnknownMethod {
                        receiver: receiver_ty.name.clone(),
                        method: method.clone(),
                        pos: pos.clone(),
                    })?;

                let formal_list = self.formals.of(&declaring, method).unwrap_or(&[]);
                if formal_list.len() != args.len() {
                    return Err(SemanticError::ArgumentCountMismatch {
                        method: method.clone(),
                        expected: formal_list.len(),
                        found: args.len(),
                        pos,
                    });
                }

                for (index, (arg, (_, formal_spelling))) in args.iter_mut().zip(formal_list.iter()).enumerate() {
                    let arg_ty = self.check_expr(arg, env)?;
                    let formal_ty = resolve_declared_type(formal_spelling, &declaring, self.classes)
                        .expect("P3 already validated every declared formal type");
                    if !self.conforms(&arg_ty, &formal_ty) {
                        return Err(SemanticError::ArgumentTypeMismatch { method: method.clone(), index, pos });
                    }
                }

                let ret_spelling = self.methods.return_type_of(&declaring, method).expect("found via find_declaring_class");
                Ok(resolve_declared_type(ret_spelling, &declaring, self.classes).expect("P3 already validated every declared return type"))
            }
        }
    }

    fn check_binop(&self, op: BinOp, lhs: &StaticType, rhs: &StaticType, pos: &jzero_ast::Pos) -> Result<StaticType, SemanticError> {
        use jzero_symtab::TypeKind::*;
        match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Pow => {
                if lhs.kind == Int32 && rhs.kind == Int32 {
                    Ok(StaticType::int32())
                } else {
                    Err(SemanticError::OperandKindMismatch { construct: op.symbol().to_string(), pos: pos.clone() })
                }
            }
            BinOp::Lt | BinOp::Le => {
                if lhs.kind == Int32 && rhs.kind == Int32 {
                    Ok(StaticType::bool())
                } else {
                    Err(SemanticError::OperandKindMismatch { construct: op.symbol().to_string(), pos: pos.clone() })
                }
            }
            BinOp::And => {
                if lhs.kind == Bool && rhs.kind == Bool {
                    Ok(StaticType::bool())
                } else {
                    Err(SemanticError::OperandKindMismatch { construct: op.symbol().to_string(), pos: pos.clone() })
                }
            }
            BinOp::Eq => {
                let both_primitive_same_kind = lhs.is_primitive() && rhs.is_primitive() && lhs.kind == rhs.kind;
                let both_class = lhs.is_class() && rhs.is_class();
                if both_primitive_same_kind || both_class {
                    Ok(StaticType::bool())
                } else {
                    Err(SemanticError::OperandKindMismatch { construct: "=".to_string(), pos: pos.clone() })
                }
            }
        }
    }

    fn join_branches(&self, then_ty: &StaticType, else_ty: &StaticType, pos: &jzero_ast::Pos) -> Result<StaticType, SemanticError> {
        if then_ty.kind == jzero_symtab::TypeKind::Unit || else_ty.kind == jzero_symtab::TypeKind::Unit {
            return Ok(StaticType::unit());
        }
        if then_ty.kind == else_ty.kind && then_ty.name == else_ty.name {
            return Ok(then_ty.clone());
        }
        if then_ty.is_class() && else_ty.is_class() {
            return Ok(StaticType::class(self.classes.lca(&then_ty.name, &else_ty.name)));
        }
        Err(SemanticError::IfBranchMismatch { pos: pos.clone() })
    }

    /// `spec.md` §4.4's identifier-resolution priority: self, then the
    /// innermost active `let`, then a formal of the enclosing method,
    /// then a field via the ancestor chain.
    fn resolve_var(&self, name: &str, env: &Env, pos: &jzero_ast::Pos) -> Result<StaticType, SemanticError> {
        if name == "self" {
            if env.in_field_init {
                return Err(SemanticError::SelfInFieldInit { pos: pos.clone() });
            }
            return Ok(StaticType::class(env.class));
        }

        if let Some(ty) = env.lookup_let(name) {
            return Ok(ty.clone());
        }

        if let Some(method) = env.method {
            if let Some((_, spelling)) = self.formals.of(env.class, method).unwrap_or(&[]).iter().find(|(n, _)| n == name) {
                return Ok(resolve_declared_type(spelling, env.class, self.classes).expect("P3 already validated every declared formal type"));
            }
        }

        if let Some(declaring) = self.fields.find_declaring_class(self.classes, env.class, name) {
            if env.in_field_init {
                return Err(SemanticError::FieldInFieldInit { name: name.to_string(), pos: pos.clone() });
            }
            let spelling = self.fields.type_of(&declaring, name).expect("found via find_declaring_class");
            return Ok(resolve_declared_type(spelling, &declaring, self.classes).expect("P3 already validated every declared field type"));
        }

        Err(SemanticError::UnboundVariable { name: name.to_string(), pos: pos.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> jzero_ast::Pos {
        jzero_ast::Pos::new("t.vsop", 1, 1)
    }

    fn setup() -> (ClassTable, MethodTable, FieldTable, FormalTable) {
        let mut classes = ClassTable::new();
        classes.insert("Object", "");
        classes.insert("Animal", "Object");
        classes.insert("Dog", "Animal");

        let mut methods = MethodTable::new();
        methods.insert("Animal", "speak", "string");

        let fields = FieldTable::new();

        let mut formals = FormalTable::new();
        formals.insert("Animal", "speak", vec![]);

        (classes, methods, fields, formals)
    }

    #[test]
    fn arithmetic_binop_infers_int32() {
        let (classes, methods, fields, formals) = setup();
        let checker = Checker { classes: &classes, methods: &methods, fields: &fields, formals: &formals };
        let mut expr = Expr::new(
            ExprKind::BinOp {
                op: BinOp::Add,
                lhs: Box::new(Expr::new(ExprKind::Int(1), pos())),
                rhs: Box::new(Expr::new(ExprKind::Int(2), pos())),
            },
            pos(),
        );
        let env = Env::for_method("Main", "main");
        let ty = checker.check_expr(&mut expr, &env).expect("should type");
        assert_eq!(ty, StaticType::int32());
    }

    #[test]
    fn mismatched_operand_kinds_are_rejected() {
        let (classes, methods, fields, formals) = setup();
        let checker = Checker { classes: &classes, methods: &methods, fields: &fields, formals: &formals };
        let mut expr = Expr::new(
            ExprKind::BinOp {
                op: BinOp::Add,
                lhs: Box::new(Expr::new(ExprKind::Int(1), pos())),
                rhs: Box::new(Expr::new(ExprKind::Bool(true), pos())),
            },
            pos(),
        );
        let env = Env::for_method("Main", "main");
        let err = checker.check_expr(&mut expr, &env).unwrap_err();
        assert!(matches!(err, SemanticError::OperandKindMismatch { .. }));
    }

    #[test]
    fn if_branch_join_falls_back_to_least_common_ancestor() {
        let (classes, methods, fields, formals) = setup();
        let checker = Checker { classes: &classes, methods: &methods, fields: &fields, formals: &formals };
        let then_ty = StaticType::class("Dog");
        let else_ty = StaticType::class("Animal");
        let joined = checker.join_branches(&then_ty, &else_ty, &pos()).expect("should join");
        assert_eq!(joined, StaticType::class("Animal"));
    }

    #[test]
    fn self_is_forbidden_in_a_field_initializer() {
        let (classes, methods, fields, formals) = setup();
        let checker = Checker { classes: &classes, methods: &methods, fields: &fields, formals: &formals };
        let env = Env::for_field_init("Dog");
        let err = checker.resolve_var("self", &env, &pos()).unwrap_err();
        assert!(matches!(err, SemanticError::SelfInFieldInit { .. }));
    }

    #[test]
    fn nested_let_bindings_shadow_correctly() {
        let (classes, methods, fields, formals) = setup();
        let checker = Checker { classes: &classes, methods: &methods, fields: &fields, formals: &formals };
        let outer = Env::for_method("Main", "main").with_let("x".to_string(), StaticType::int32());
        let inner = outer.with_let("x".to_string(), StaticType::bool());
        assert_eq!(checker.resolve_var("x", &inner, &pos()).unwrap(), StaticType::bool());
        assert_eq!(checker.resolve_var("x", &outer, &pos()).unwrap(), StaticType::int32());
    }

    #[test]
    fn unbound_variable_is_reported() {
        let (classes, methods, fields, formals) = setup();
        let checker = Checker { classes: &classes, methods: &methods, fields: &fields, formals: &formals };
        let env = Env::for_method("Main", "main");
        let err = checker.resolve_var("ghost", &env, &pos()).unwrap_err();
        assert!(matches!(err, SemanticError::UnboundVariable { .. }));
    }

    #[test]
    fn method_lookup_through_ancestor_constrains_arity() {
        let (classes, methods, fields, formals) = setup();
        let checker = Checker { classes: &classes, methods: &methods, fields: &fields, formals: &formals };
        let mut expr = Expr::new(
            ExprKind::Call {
                receiver: Box::new(Expr::new(ExprKind::New("Dog".to_string()), pos())),
                method: "speak".to_string(),
                args: vec![Expr::new(ExprKind::Int(0), pos())],
            },
            pos(),
        );
        let env = Env::for_method("Main", "main");
        let err = checker.check_expr(&mut expr, &env).unwrap_err();
        assert!(matches!(err, SemanticError::ArgumentCountMismatch { expected: 0, found: 1, .. }));
    }
}
