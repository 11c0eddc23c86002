use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use elysia_core::{PaginationMeta, PaginationParams};
use elysia_models::admins::{
    AdminStatus, AdminUser, CreateAdminRequest, PaginatedAdminsResponse,
    UpdateAdminPasswordRequest, UpdateAdminStatusRequest,
};
use elysia_models::approvals::{
    ApproveTeacherRequest, PaginatedApprovalsResponse, TeacherApproval,
};
use elysia_models::auth::{
    AdminAuthResponse, CodeType, MeResponse, MessageResponse, PhonePasswordLoginRequest,
    RoleProfile, SendCodeRequest, SendCodeResponse, SmsCodeRequest, StudentAuthResponse,
    StudentPasswordLoginRequest, StudentSmsRegisterRequest, TeacherAuthResponse,
    TeacherRegisterResponse, VerifyCodeRequest,
};
use elysia_models::classes::{
    Class, ClassMemberDetail, ClassStatus, CreateClassRequest, JoinClassRequest,
    PaginatedClassesResponse, PaginatedMembersResponse, UpdateClassRequest,
};
use elysia_models::problems::{
    CreateProblemRequest, Difficulty, PaginatedProblemsResponse, Problem, UpdateProblemRequest,
};
use elysia_models::students::{
    PaginatedStudentsResponse, Student, StudentStatus, UpdateLearningProgressDto,
    UpdateStudentDto, UpdateStudentStatusDto,
};
use elysia_models::subjects::{
    CreateSubjectRequest, PaginatedSubjectsResponse, Subject, SubjectStatus, UpdateSubjectRequest,
};
use elysia_models::teachers::{
    PaginatedTeachersResponse, RegisterTeacherRequest, Teacher, TeacherStatus, UpdateTeacherDto,
    VerificationStatus, VerifyTeacherRequest,
};

/// Body of every error response.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::send_student_code,
        crate::modules::auth::controller::register_student,
        crate::modules::auth::controller::login_student_sms,
        crate::modules::auth::controller::login_student_password,
        crate::modules::auth::controller::send_teacher_code,
        crate::modules::auth::controller::register_teacher,
        crate::modules::auth::controller::login_teacher_sms,
        crate::modules::auth::controller::login_teacher_password,
        crate::modules::auth::controller::send_admin_code,
        crate::modules::auth::controller::register_admin,
        crate::modules::auth::controller::login_admin_sms,
        crate::modules::auth::controller::login_admin_password,
        crate::modules::auth::controller::verify_code,
        crate::modules::auth::controller::get_me,
        crate::modules::auth::controller::logout,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::update_learning_progress,
        crate::modules::students::controller::update_student_status,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::get_teacher_approval,
        crate::modules::approvals::controller::get_approvals,
        crate::modules::approvals::controller::get_approval,
        crate::modules::approvals::controller::approve_teacher,
        crate::modules::approvals::controller::delete_approval,
        crate::modules::approvals::controller::verify_teacher,
        crate::modules::admins::controller::create_admin,
        crate::modules::admins::controller::get_admins,
        crate::modules::admins::controller::get_admin,
        crate::modules::admins::controller::update_admin_password,
        crate::modules::admins::controller::update_admin_status,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::get_my_classes,
        crate::modules::classes::controller::join_class,
        crate::modules::classes::controller::get_class_by_code,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::leave_class,
        crate::modules::classes::controller::get_class_members,
        crate::modules::classes::controller::remove_class_member,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::get_subject,
        crate::modules::subjects::controller::get_subject_by_code,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::update_subject,
        crate::modules::subjects::controller::delete_subject,
        crate::modules::subjects::controller::enable_subject,
        crate::modules::subjects::controller::disable_subject,
        crate::modules::problems::controller::get_problems,
        crate::modules::problems::controller::get_problem,
        crate::modules::problems::controller::create_problem,
        crate::modules::problems::controller::update_problem,
        crate::modules::problems::controller::delete_problem,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            PaginationMeta,
            PaginationParams,
            CodeType,
            SendCodeRequest,
            SendCodeResponse,
            VerifyCodeRequest,
            SmsCodeRequest,
            StudentSmsRegisterRequest,
            StudentPasswordLoginRequest,
            PhonePasswordLoginRequest,
            StudentAuthResponse,
            TeacherAuthResponse,
            TeacherRegisterResponse,
            AdminAuthResponse,
            RoleProfile,
            MeResponse,
            Student,
            StudentStatus,
            UpdateStudentDto,
            UpdateLearningProgressDto,
            UpdateStudentStatusDto,
            PaginatedStudentsResponse,
            Teacher,
            TeacherStatus,
            VerificationStatus,
            RegisterTeacherRequest,
            UpdateTeacherDto,
            VerifyTeacherRequest,
            PaginatedTeachersResponse,
            TeacherApproval,
            ApproveTeacherRequest,
            PaginatedApprovalsResponse,
            AdminUser,
            AdminStatus,
            CreateAdminRequest,
            UpdateAdminPasswordRequest,
            UpdateAdminStatusRequest,
            PaginatedAdminsResponse,
            Class,
            ClassStatus,
            ClassMemberDetail,
            CreateClassRequest,
            UpdateClassRequest,
            JoinClassRequest,
            PaginatedClassesResponse,
            PaginatedMembersResponse,
            Subject,
            SubjectStatus,
            CreateSubjectRequest,
            UpdateSubjectRequest,
            PaginatedSubjectsResponse,
            Problem,
            Difficulty,
            CreateProblemRequest,
            UpdateProblemRequest,
            PaginatedProblemsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Student Auth", description = "Student SMS registration and login"),
        (name = "Teacher Auth", description = "Teacher registration and login"),
        (name = "Admin Auth", description = "Admin SMS registration and login"),
        (name = "Auth", description = "Code checks and session endpoints"),
        (name = "Students", description = "Student profiles"),
        (name = "Teachers", description = "Teacher profiles"),
        (name = "Approvals", description = "Teacher approval workflow"),
        (name = "Admins", description = "Admin account management"),
        (name = "Classes", description = "Classes and membership"),
        (name = "Subjects", description = "Subject catalogue"),
        (name = "Problems", description = "Programming problems")
    ),
    info(
        title = "Elysia API",
        version = "0.1.0",
        description = "School management backend with SMS and password authentication for students, teachers and admins."
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
